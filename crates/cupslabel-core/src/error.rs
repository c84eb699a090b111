// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for cupslabel.

use thiserror::Error;

/// Top-level error type for all label printing operations.
///
/// Media size inference never produces one of these: a PDF whose page size
/// cannot be determined is logged and printed with the queue default.
#[derive(Debug, Error)]
pub enum LabelError {
    // -- Input errors --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported label payload type: {0}")]
    UnsupportedPayloadType(String),

    // -- Settings --
    #[error("settings error: {0}")]
    Settings(String),

    // -- Print errors --
    #[error("{0}")]
    SubmissionFailure(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LabelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelError>;
