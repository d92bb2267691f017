#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub use crate::client::{ReqwestProbe, TRACING_TARGET};
pub use crate::config::{DEFAULT_TIMEOUT_SECS, ReqwestProbeConfig};
pub use crate::error::{Error, Result};
