//! Theme preference with persistence and live observation.
//!
//! The active palette is published on a watch channel, so a subscriber that
//! attaches late still sees the current theme. The full config is persisted,
//! and a saved theme is restored when the manager is built.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use crate::storage::SessionStore;

pub const THEME_KEY: &str = "herald_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
}

/// A named palette. The color values feed whatever surface renders the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: ThemeName,
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_secondary: String,
    pub border: String,
    pub shadow: String,
}

impl ThemeConfig {
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            primary: "#007bff".to_string(),
            secondary: "#6c757d".to_string(),
            background: "#ffffff".to_string(),
            surface: "#f8f9fa".to_string(),
            text: "#2c3e50".to_string(),
            text_secondary: "#6c757d".to_string(),
            border: "#e9ecef".to_string(),
            shadow: "rgba(0, 0, 0, 0.1)".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            primary: "#4dabf7".to_string(),
            secondary: "#adb5bd".to_string(),
            background: "#1a1a1a".to_string(),
            surface: "#2d2d2d".to_string(),
            text: "#ffffff".to_string(),
            text_secondary: "#adb5bd".to_string(),
            border: "#404040".to_string(),
            shadow: "rgba(0, 0, 0, 0.3)".to_string(),
        }
    }

    fn for_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
        }
    }
}

pub struct ThemeManager {
    store: Arc<dyn SessionStore>,
    tx: watch::Sender<ThemeConfig>,
}

impl ThemeManager {
    /// Builds the manager, restoring a saved theme or defaulting to light.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let initial = load_saved_theme(store.as_ref()).unwrap_or_else(ThemeConfig::light);
        let (tx, _) = watch::channel(initial);
        Self { store, tx }
    }

    pub fn current(&self) -> ThemeConfig {
        self.tx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ThemeConfig> {
        self.tx.subscribe()
    }

    /// Flips between light and dark, persisting the result.
    pub fn toggle(&self) -> ThemeConfig {
        let next = match self.tx.borrow().name {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        };
        self.set(next)
    }

    pub fn set(&self, name: ThemeName) -> ThemeConfig {
        let theme = ThemeConfig::for_name(name);
        self.persist(&theme);
        self.tx.send_replace(theme.clone());
        theme
    }

    /// Persistence is best-effort; a failing store keeps the in-memory theme.
    fn persist(&self, theme: &ThemeConfig) {
        match serde_json::to_string(theme) {
            Ok(raw) => {
                if let Err(e) = self.store.set(THEME_KEY, &raw) {
                    warn!("failed to persist theme: {e}");
                }
            }
            Err(e) => warn!("failed to serialize theme: {e}"),
        }
    }
}

fn load_saved_theme(store: &dyn SessionStore) -> Option<ThemeConfig> {
    let raw = match store.get(THEME_KEY) {
        Ok(v) => v?,
        Err(e) => {
            warn!("theme store read failed: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(theme) => Some(theme),
        Err(e) => {
            warn!("saved theme is unreadable, falling back to light: {e}");
            None
        }
    }
}
