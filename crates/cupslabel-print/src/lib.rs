// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cupslabel-print — Translates print preferences into an IPP Print-Job and
// submits it to a CUPS queue.

pub mod assembler;
pub mod feed;
pub mod ipp_client;
pub mod options;
pub mod service;
pub mod submit;

pub use assembler::JobRequestAssembler;
pub use feed::FeedPolicy;
pub use ipp_client::IppClient;
pub use options::{JobOptionToken, TokenValue, parse_job_options};
pub use service::{LabelPrinter, PrintOptions, PrintRequest};
pub use submit::{IppSubmitter, JobSubmitter};
