//! Server-side HTML for the login gate and the dashboard.
//!
//! There is a single dashboard renderer; [`PageOptions`] switches the optional
//! decorations on and off.

pub mod dashboard;
pub mod layout;
pub mod login;
pub mod map;

pub use dashboard::render_dashboard;
pub use login::render_login;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub title: String,
    /// Prefix section headers and buttons with emoji.
    pub decorated_headers: bool,
    /// Include the time and location rows in the statistics table.
    pub extended_stats: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Location Tracking".into(),
            decorated_headers: true,
            extended_stats: true,
        }
    }
}

impl PageOptions {
    pub(crate) fn heading(&self, emoji: &str, text: &str) -> String {
        if self.decorated_headers {
            format!("{} {}", emoji, text)
        } else {
            text.to_string()
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
