// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cupslabel-document — Document handling for label printing.
//
// Turns whatever the host hands over into canonical document bytes, and
// works out the physical label size from those bytes when the media policy
// asks for it.

pub mod integrity;
pub mod media;
pub mod payload;
pub mod pdf;

pub use integrity::hash_bytes;
pub use media::{MediaPolicy, MediaResolver, format_mm};
pub use payload::{LabelPayload, normalize};
pub use pdf::reader::{PageBox, PdfReader};
