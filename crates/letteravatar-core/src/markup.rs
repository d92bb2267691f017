//! The `<img>` fragment handed back to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Class token every avatar carries.
pub const AVATAR_CLASS: &str = "letter-avatar";

/// Class token added when round style is enabled.
pub const ROUND_CLASS: &str = "round-avatars";

/// Rendered avatar markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Borrows the markup text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the markup into its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Attributes of an avatar image tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag<'a> {
    pub alt: &'a str,
    pub src: &'a str,
    /// Requested size, used for both width and height.
    pub size: u32,
    pub round: bool,
    /// Remote image a browser script may swap in.
    pub remote_src: Option<&'a str>,
}

impl ImageTag<'_> {
    /// Renders the tag. Attribute values are escaped.
    pub fn render(&self) -> Markup {
        let mut class = format!("avatar avatar-{} photo {AVATAR_CLASS}", self.size);
        if self.round {
            class.push(' ');
            class.push_str(ROUND_CLASS);
        }

        let mut html = format!(
            "<img alt='{}' src='{}' class='{class}' width='{size}' height='{size}'",
            escape_attribute(self.alt),
            escape_attribute(self.src),
            size = self.size,
        );
        if let Some(remote_src) = self.remote_src {
            html.push_str(" data-remote-src='");
            html.push_str(&escape_attribute(remote_src));
            html.push('\'');
        }
        html.push_str(" />");

        Markup(html)
    }
}

/// Escapes a value for use inside a quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
