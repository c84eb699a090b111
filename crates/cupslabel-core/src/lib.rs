// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cupslabel — Core types, settings, and error definitions shared across all
// crates.

pub mod config;
pub mod error;
pub mod plugin;
pub mod tags;
pub mod types;

pub use config::{JsonSettings, MemorySettings, PluginSettings, SettingsStore};
pub use error::LabelError;
pub use tags::{AttributeTagRegistry, WireTag};
pub use types::*;
