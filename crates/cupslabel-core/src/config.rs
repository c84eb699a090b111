// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer settings.
//
// The host application owns persistence; this module only reads values by
// key and resolves them against the documented defaults.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{LabelError, Result};
use crate::types::PrinterDestination;

pub const CUPS_HOST: &str = "CUPS_HOST";
pub const CUPS_QUEUE: &str = "CUPS_QUEUE";
pub const CUPS_PORT: &str = "CUPS_PORT";
pub const DEFAULT_MEDIA: &str = "DEFAULT_MEDIA";
pub const DEFAULT_FEED_AFTER_MM: &str = "DEFAULT_FEED_AFTER_MM";
pub const JOB_OPTIONS: &str = "JOB_OPTIONS";

/// Job options sent when none are configured.
pub const DEFAULT_JOB_OPTIONS: &str =
    "print-scaling=none\nTrimMode=Strong\nBlankSpace=False\norientation-requested=none";

/// Host-visible description of a single setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
}

/// Every setting the label printer reads, in display order.
pub const SETTING_DEFINITIONS: &[SettingDefinition] = &[
    SettingDefinition {
        key: CUPS_HOST,
        name: "CUPS Host",
        description: "CUPS server hostname",
        default: "portterm",
    },
    SettingDefinition {
        key: CUPS_QUEUE,
        name: "CUPS Queue",
        description: "Filtered CUPS queue name",
        default: "devterm_printer",
    },
    SettingDefinition {
        key: CUPS_PORT,
        name: "CUPS Port",
        description: "CUPS server port",
        default: "631",
    },
    SettingDefinition {
        key: DEFAULT_MEDIA,
        name: "Default Media",
        description: "Media override: blank=queue default, auto=derive from PDF, or explicit (e.g. Custom.48x30mm)",
        default: "auto",
    },
    SettingDefinition {
        key: DEFAULT_FEED_AFTER_MM,
        name: "Default Feed After (mm)",
        description: "Extra feed after print, 0 disables (valid range 0-45)",
        default: "0",
    },
    SettingDefinition {
        key: JOB_OPTIONS,
        name: "IPP Job Options",
        description: "Lines of key=value options. Use orientation-requested=none to preserve PDF orientation.",
        default: DEFAULT_JOB_OPTIONS,
    },
];

/// Look up the definition for `key`.
pub fn definition(key: &str) -> Option<&'static SettingDefinition> {
    SETTING_DEFINITIONS.iter().find(|def| def.key == key)
}

/// Key-value read access to persisted settings.
pub trait SettingsStore: Send + Sync {
    /// Raw stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stored value, or the documented default when the key is missing.
    ///
    /// A stored empty string is returned as is.
    fn get_or_default(&self, key: &str) -> String {
        self.get(key).unwrap_or_else(|| default_for(key))
    }

    /// Stored value, or the documented default when missing or blank.
    fn get_non_blank_or_default(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => value,
            _ => default_for(key),
        }
    }
}

fn default_for(key: &str) -> String {
    definition(key)
        .map(|def| def.default.to_owned())
        .unwrap_or_default()
}

/// In-process settings, mainly for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_owned(), value.into());
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Settings loaded from a flat JSON object file.
///
/// Non-string JSON values are stored in their JSON text form, so
/// `{"CUPS_PORT": 8631}` reads back as `"8631"`.
#[derive(Debug, Clone, Default)]
pub struct JsonSettings {
    values: HashMap<String, String>,
}

impl JsonSettings {
    /// Load from `path`. A missing file yields empty settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
            .map_err(|e| LabelError::Settings(format!("{}: {e}", path.display())))
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(data)?;
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();
        Ok(Self { values })
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// All settings resolved and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSettings {
    pub cups_host: String,
    pub cups_queue: String,
    pub cups_port: u16,
    pub default_media: String,
    pub default_feed_after_mm: f64,
    pub job_options: String,
}

impl PluginSettings {
    /// Read every setting from `store`, falling back to defaults.
    ///
    /// The connection settings and the feed default need a value, so blank
    /// counts as missing for them. `DEFAULT_MEDIA` and `JOB_OPTIONS` keep a
    /// stored blank: no `media` attribute and no extra job options.
    pub fn resolve(store: &dyn SettingsStore) -> Result<Self> {
        let port_text = store.get_non_blank_or_default(CUPS_PORT);
        let cups_port = port_text.trim().parse::<u16>().map_err(|e| {
            LabelError::InvalidInput(format!("{CUPS_PORT} '{port_text}' is not a valid port: {e}"))
        })?;

        let feed_text = store.get_non_blank_or_default(DEFAULT_FEED_AFTER_MM);
        let default_feed_after_mm = feed_text.trim().parse::<f64>().map_err(|e| {
            LabelError::InvalidInput(format!(
                "{DEFAULT_FEED_AFTER_MM} '{feed_text}' is not a number: {e}"
            ))
        })?;

        Ok(Self {
            cups_host: store.get_non_blank_or_default(CUPS_HOST),
            cups_queue: store.get_non_blank_or_default(CUPS_QUEUE),
            cups_port,
            default_media: store.get_or_default(DEFAULT_MEDIA),
            default_feed_after_mm,
            job_options: store.get_or_default(JOB_OPTIONS),
        })
    }

    pub fn destination(&self) -> PrinterDestination {
        PrinterDestination::new(&self.cups_host, self.cups_port, &self.cups_queue)
    }
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            cups_host: "portterm".into(),
            cups_queue: "devterm_printer".into(),
            cups_port: 631,
            default_media: "auto".into(),
            default_feed_after_mm: 0.0,
            job_options: DEFAULT_JOB_OPTIONS.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_store_resolves_to_defaults() {
        let settings = PluginSettings::resolve(&MemorySettings::new()).unwrap();
        assert_eq!(settings, PluginSettings::default());
        assert_eq!(
            settings.destination().uri(),
            "ipp://portterm:631/printers/devterm_printer"
        );
    }

    #[test]
    fn blank_values_fall_back() {
        let store = MemorySettings::new().with(CUPS_HOST, "").with(CUPS_QUEUE, "labels");
        let settings = PluginSettings::resolve(&store).unwrap();
        assert_eq!(settings.cups_host, "portterm");
        assert_eq!(settings.cups_queue, "labels");
    }

    #[test]
    fn blank_media_and_job_options_are_kept() {
        let store = MemorySettings::new()
            .with(DEFAULT_MEDIA, "")
            .with(JOB_OPTIONS, "")
            .with(CUPS_PORT, " ")
            .with(DEFAULT_FEED_AFTER_MM, "");
        let settings = PluginSettings::resolve(&store).unwrap();
        assert_eq!(settings.default_media, "");
        assert_eq!(settings.job_options, "");
        assert_eq!(settings.cups_port, 631);
        assert_eq!(settings.default_feed_after_mm, 0.0);

        let settings = PluginSettings::resolve(&MemorySettings::new()).unwrap();
        assert_eq!(settings.default_media, "auto");
        assert_eq!(settings.job_options, DEFAULT_JOB_OPTIONS);
    }

    #[test]
    fn bad_port_is_invalid_input() {
        let store = MemorySettings::new().with(CUPS_PORT, "ipp");
        let err = PluginSettings::resolve(&store).unwrap_err();
        assert!(matches!(err, LabelError::InvalidInput(_)));
    }

    #[test]
    fn feed_default_parses_as_float() {
        let store = MemorySettings::new().with(DEFAULT_FEED_AFTER_MM, " 7.5 ");
        let settings = PluginSettings::resolve(&store).unwrap();
        assert_eq!(settings.default_feed_after_mm, 7.5);
    }

    #[test]
    fn json_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"CUPS_HOST": "printhost", "CUPS_PORT": 8631, "DEFAULT_MEDIA": null}}"#
        )
        .unwrap();

        let store = JsonSettings::load(file.path()).unwrap();
        assert_eq!(store.get(CUPS_HOST).as_deref(), Some("printhost"));
        assert_eq!(store.get(CUPS_PORT).as_deref(), Some("8631"));
        assert_eq!(store.get(DEFAULT_MEDIA), None);

        let settings = PluginSettings::resolve(&store).unwrap();
        assert_eq!(settings.cups_port, 8631);
        assert_eq!(settings.default_media, "auto");
    }

    #[test]
    fn json_settings_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettings::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get(CUPS_HOST), None);
    }

    #[test]
    fn json_settings_rejects_non_object() {
        let err = JsonSettings::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, LabelError::Settings(_)));
    }

    #[test]
    fn every_definition_has_a_default_entry() {
        for def in SETTING_DEFINITIONS {
            assert_eq!(definition(def.key), Some(def));
        }
        assert_eq!(SETTING_DEFINITIONS.len(), 6);
    }
}
