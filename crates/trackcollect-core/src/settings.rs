//! Collector Settings
//!
//! Persistent run configuration with:
//! - Per-field defaults for missing keys
//! - Normalization of out-of-range values
//! - Atomic file writes (temp file + rename)

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collector::AlignmentMode;
use crate::fs::{atomic_write_json_indented, DEFAULT_JSON_INDENT};
use crate::CollectResult;

/// Settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Upper bound for the exported JSON indentation width
pub const MAX_JSON_INDENT: usize = 8;

/// Collector settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectorSettings {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Aggregation settings
    #[serde(default)]
    pub collector: AggregationSettings,

    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            collector: AggregationSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

/// Track aggregation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSettings {
    #[serde(default)]
    pub alignment: AlignmentMode,
}

/// Document export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Spaces per indentation level in written JSON
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,
}

fn default_json_indent() -> usize {
    DEFAULT_JSON_INDENT
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            json_indent: default_json_indent(),
        }
    }
}

impl CollectorSettings {
    /// Corrects out-of-range values in place.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;
        self.export.json_indent = self.export.json_indent.min(MAX_JSON_INDENT);
    }

    /// Loads settings from `path`.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "Settings file not found, using defaults");
            return Self::default();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))
            .and_then(|content| {
                serde_json::from_str::<Self>(&content)
                    .map_err(|e| format!("Failed to parse settings file: {}", e))
            });

        match parsed {
            Ok(mut settings) => {
                settings.normalize();
                settings
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Normalizes and atomically writes the settings to `path`.
    pub fn save(&self, path: &Path) -> CollectResult<Self> {
        let mut normalized = self.clone();
        normalized.normalize();
        atomic_write_json_indented(path, &normalized, DEFAULT_JSON_INDENT)?;
        Ok(normalized)
    }
}

// =============================================================================
// Tests
// =============================================================================
