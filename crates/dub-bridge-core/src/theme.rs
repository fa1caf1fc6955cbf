//! Theme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the OS preference.
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Toggle order: system → light → dark → system.
    pub fn next(self) -> Self {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "system" => Ok(Theme::System),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// String key-value persistence for the preference.
pub trait ThemeStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError>;
}

/// Stored preference, or `System` when missing or unrecognized.
pub fn load_theme<S: ThemeStore>(store: &S, key: &str) -> Theme {
    match store.load(key) {
        Some(raw) => raw.parse().unwrap_or_else(|()| {
            tracing::warn!(target: "dub::theme", value = %raw, "unknown stored theme, using system");
            Theme::System
        }),
        None => Theme::System,
    }
}

/// Advance to the next theme and persist it. The new theme is returned even
/// when persisting fails, so the page can still apply it for this session.
pub fn toggle_theme<S: ThemeStore>(store: &S, key: &str) -> Theme {
    let next = load_theme(store, key).next();
    if let Err(e) = store.save(key, next.as_str()) {
        tracing::warn!(target: "dub::theme", "failed to persist theme: {e}");
    }
    next
}
