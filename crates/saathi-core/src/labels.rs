//! Display labels for the splash screen
//!
//! Text comes from an optional [`LabelProvider`] (typically backed by the
//! host's localization catalogue). When the provider is absent, or cannot
//! answer for a key, [`SplashLabels::resolve`] substitutes the built-in
//! defaults. A missing provider is never an error for the host.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LabelError;

/// Application name shown when no catalogue supplies one
pub const DEFAULT_APP_NAME: &str = "स्वास्थ्य साथी";

/// Loading text shown when no catalogue supplies one
pub const DEFAULT_LOADING_TEXT: &str = "Loading";

/// Keys the splash screen asks a provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKey {
    #[serde(rename = "appName")]
    AppName,
    #[serde(rename = "loading")]
    Loading,
}

impl LabelKey {
    pub const ALL: [LabelKey; 2] = [LabelKey::AppName, LabelKey::Loading];

    /// Catalogue key, as used by the host's translation tables
    pub fn as_str(self) -> &'static str {
        match self {
            LabelKey::AppName => "appName",
            LabelKey::Loading => "loading",
        }
    }

    /// Built-in text for this key
    pub fn default_text(self) -> &'static str {
        match self {
            LabelKey::AppName => DEFAULT_APP_NAME,
            LabelKey::Loading => DEFAULT_LOADING_TEXT,
        }
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of localized label text
pub trait LabelProvider: Send + Sync {
    /// Look up the text for `key`
    fn lookup(&self, key: LabelKey) -> Result<String, LabelError>;
}

/// Provider that always answers with the built-in text
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLabels;

impl LabelProvider for DefaultLabels {
    fn lookup(&self, key: LabelKey) -> Result<String, LabelError> {
        Ok(key.default_text().to_string())
    }
}

/// Provider backed by an in-memory catalogue
///
/// Deserializes from a flat JSON object such as
/// `{"appName": "Swasthya Saathi", "loading": "Loading"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticLabels {
    entries: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text for a key
    pub fn with(mut self, key: LabelKey, text: impl Into<String>) -> Self {
        self.entries.insert(key.as_str().to_string(), text.into());
        self
    }

    /// Parse a catalogue from JSON
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LabelProvider for StaticLabels {
    fn lookup(&self, key: LabelKey) -> Result<String, LabelError> {
        self.entries
            .get(key.as_str())
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .ok_or_else(|| LabelError::MissingLabel(key.as_str().to_string()))
    }
}

/// Resolved text for one splash screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashLabels {
    pub app_name: String,
    pub loading_text: String,
}

impl Default for SplashLabels {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            loading_text: DEFAULT_LOADING_TEXT.to_string(),
        }
    }
}

impl SplashLabels {
    /// Resolve every label, falling back per key to the built-in text
    pub fn resolve(provider: Option<&dyn LabelProvider>) -> Self {
        let Some(provider) = provider else {
            warn!("No label provider available, using default labels");
            return Self::default();
        };

        Self {
            app_name: lookup_or_default(provider, LabelKey::AppName),
            loading_text: lookup_or_default(provider, LabelKey::Loading),
        }
    }

    /// Text for a key
    pub fn get(&self, key: LabelKey) -> &str {
        match key {
            LabelKey::AppName => &self.app_name,
            LabelKey::Loading => &self.loading_text,
        }
    }
}

fn lookup_or_default(provider: &dyn LabelProvider, key: LabelKey) -> String {
    match provider.lookup(key) {
        Ok(text) => text,
        Err(e) => {
            warn!(key = %key, error = %e, "Label lookup failed, using default");
            key.default_text().to_string()
        }
    }
}
