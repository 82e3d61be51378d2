//! Login form rendering.
//!
//! The page itself is a compiled askama template. Operators may replace the header
//! and footer fragments with files and add a stylesheet; fragment files are read on
//! every render so edits show up without a restart.

use crate::config::AppConfig;
use askama::Template;
use std::path::{Path, PathBuf};

pub const DEFAULT_HEADER: &str = "<h2>Login</h2>";
pub const DEFAULT_FOOTER: &str = "";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    challenge: &'a str,
    /// Pre-escaped alert text.
    alert: String,
    header: String,
    footer: String,
    stylesheet: Option<&'a str>,
}

#[derive(Clone, Debug, Default)]
pub struct FormRenderer {
    header_path: Option<PathBuf>,
    footer_path: Option<PathBuf>,
    stylesheet: Option<String>,
}

impl FormRenderer {
    pub fn new(
        header_path: Option<PathBuf>,
        footer_path: Option<PathBuf>,
        stylesheet: Option<String>,
    ) -> Self {
        Self {
            header_path,
            footer_path,
            stylesheet,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.custom_header_path.clone(),
            config.custom_footer_path.clone(),
            config.custom_stylesheet_path.clone(),
        )
    }

    /// Render the login page for `challenge`. An empty `alert` renders no alert box.
    #[tracing::instrument(skip_all, fields(has_alert = !alert.is_empty()))]
    pub async fn render(&self, challenge: &str, alert: &str) -> Result<String, askama::Error> {
        let header = read_fragment("header", self.header_path.as_deref(), DEFAULT_HEADER).await;
        let footer = read_fragment("footer", self.footer_path.as_deref(), DEFAULT_FOOTER).await;

        LoginTemplate {
            challenge,
            alert: escape_text(alert),
            header,
            footer,
            stylesheet: self.stylesheet.as_deref(),
        }
        .render()
    }
}

/// Read an operator-supplied fragment, falling back to `default` on any failure.
async fn read_fragment(name: &str, path: Option<&Path>, default: &str) -> String {
    let Some(path) = path else {
        return default.to_string();
    };
    match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(
                fragment = name,
                path = %path.display(),
                error = %e,
                "Could not read custom template fragment, using default"
            );
            default.to_string()
        }
    }
}

/// Escape text for an HTML element body. Quotes are left alone since they are
/// harmless outside attributes and alerts quote user names.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
