// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identity of the label printer integration as registered with the host.

use serde::Serialize;

/// Static metadata describing the label printer to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub version: &'static str,
    /// The host must wait for `print_label` to return before reporting
    /// the outcome; there is no asynchronous completion callback.
    pub blocking_print: bool,
}

/// The DevTerm CUPS label printer.
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: "DevTerm CUPS Label Printer",
    slug: "devterm_cups_label_printer",
    title: "DevTerm CUPS Label Printer",
    description: "Send generated InvenTree PDF labels to CUPS queue on portterm via IPP",
    author: "Gray Stone",
    version: env!("CARGO_PKG_VERSION"),
    blocking_print: true,
};
