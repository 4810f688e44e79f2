//! Theme module - light/dark preference
//!
//! The preference is resolved per request: the stored cookie wins, then the
//! `Sec-CH-Prefers-Color-Scheme` client hint, then the dark default. Toggling
//! flips the resolved theme and stores the result in the cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the cookie holding the stored preference
pub const THEME_COOKIE: &str = "theme";

/// Client hint carrying the system preference
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Where a resolved theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    System,
    Default,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Resolve from a stored value and a system preference, in that order
    ///
    /// Unrecognized values are ignored rather than rejected.
    pub fn resolve(stored: Option<&str>, system: Option<&str>) -> (Theme, ThemeSource) {
        if let Some(theme) = stored.and_then(|v| v.parse().ok()) {
            return (theme, ThemeSource::Stored);
        }
        if let Some(theme) = system.and_then(|v| v.parse().ok()) {
            return (theme, ThemeSource::System);
        }
        (Theme::default(), ThemeSource::Default)
    }

    /// Resolve from request headers
    pub fn from_headers(headers: &HeaderMap) -> Theme {
        let stored = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| cookie_value(header, THEME_COOKIE));
        let system = headers
            .get(COLOR_SCHEME_HINT)
            .and_then(|value| value.to_str().ok());

        let (theme, source) = Theme::resolve(stored, system);
        tracing::trace!("Resolved {} theme from {:?}", theme, source);
        theme
    }

    /// `Set-Cookie` value storing this theme
    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            THEME_COOKIE,
            self.as_str(),
            COOKIE_MAX_AGE
        )
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"').to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Value of a named cookie in a `Cookie` header
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
