#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;

pub mod assets;
pub mod config;
pub mod identity;
pub mod letter;
pub mod markup;
pub mod remote;
pub mod render;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub mod prelude;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::service::{AvatarService, AvatarServiceBuilder};

/// Tracing target for identity resolution.
pub const TRACING_TARGET_IDENTITY: &str = "letteravatar_core::identity";

/// Tracing target for configuration loading.
pub const TRACING_TARGET_CONFIG: &str = "letteravatar_core::config";

/// Tracing target for remote existence checks.
pub const TRACING_TARGET_REMOTE: &str = "letteravatar_core::remote";

/// Tracing target for avatar rendering.
pub const TRACING_TARGET_RENDER: &str = "letteravatar_core::render";
