//! Persisted client preferences.
//!
//! Each preference lives under its own key and is read and written
//! independently of the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::kv::{KeyValueStore, StorageError};

pub const LAST_BUDGET_KEY: &str = "lastBudgetId";
pub const THEME_KEY: &str = "theme";
pub const CURRENCY_KEY: &str = "currency";
pub const DASHBOARD_LAYOUT_KEY: &str = "dashboardLayout";

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}

/// Position of one dashboard widget on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    /// Widget identifier.
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Typed access to UI preferences.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn last_budget_id(&self) -> Option<i64> {
        self.read(LAST_BUDGET_KEY)?.parse().ok()
    }

    pub fn set_last_budget_id(&self, id: Option<i64>) -> Result<(), StorageError> {
        match id {
            Some(id) => self.store.set(LAST_BUDGET_KEY, &id.to_string()),
            None => self.store.remove(LAST_BUDGET_KEY),
        }
    }

    pub fn theme(&self) -> Theme {
        match self.read(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    pub fn currency(&self) -> String {
        self.read(CURRENCY_KEY)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }

    pub fn set_currency(&self, code: &str) -> Result<(), StorageError> {
        self.store.set(CURRENCY_KEY, &code.to_ascii_uppercase())
    }

    /// Saved grid positions. Unreadable layouts are treated as absent.
    pub fn dashboard_layout(&self) -> Option<Vec<WidgetLayout>> {
        let raw = self.read(DASHBOARD_LAYOUT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(layout) => Some(layout),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable dashboard layout");
                None
            }
        }
    }

    pub fn set_dashboard_layout(&self, layout: &[WidgetLayout]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(layout)?;
        self.store.set(DASHBOARD_LAYOUT_KEY, &raw)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Preference storage unavailable");
                None
            }
        }
    }
}
