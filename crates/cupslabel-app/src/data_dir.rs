// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings file location.

use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

/// Default settings file, `<config dir>/cupslabel/settings.json`.
pub fn settings_path() -> PathBuf {
    config_base(
        std::env::var_os("XDG_CONFIG_HOME").as_deref().map(Path::new),
        std::env::var_os("HOME").as_deref().map(Path::new),
    )
    .join("cupslabel")
    .join(SETTINGS_FILE)
}

fn config_base(xdg: Option<&Path>, home: Option<&Path>) -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Some(xdg) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return xdg.to_path_buf();
    }
    if let Some(home) = home {
        return home.join(".config");
    }
    // Last resort
    PathBuf::from("/etc")
}
