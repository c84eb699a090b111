// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label printer service — the entry point the host calls once per label.
//
// Resolves the effective options (request values over configured defaults),
// normalises the payload, assembles the Print-Job and submits it. The call
// returns only after the print server has answered.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, instrument};

use cupslabel_core::config::{PluginSettings, SettingsStore};
use cupslabel_core::error::{LabelError, Result};
use cupslabel_core::tags::AttributeTagRegistry;
use cupslabel_core::types::PrintJobRequest;
use cupslabel_document::{LabelPayload, hash_bytes, normalize};

use crate::assembler::{JobParameters, JobRequestAssembler};
use crate::submit::{IppSubmitter, JobSubmitter};

/// Title used when the request does not name the job.
pub const DEFAULT_TITLE: &str = "inventree-label";

/// Keyword arguments checked for the label document, in order.
pub const PAYLOAD_KEYS: &[&str] = &["pdf_data", "label", "data", "payload"];

/// Per-request printing options supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    pub media: Option<String>,
    pub copies: Option<u32>,
    pub title: Option<String>,
    pub feed_after_mm: Option<f64>,
    pub job_options: Option<String>,
}

impl PrintOptions {
    /// Reject values outside the documented ranges.
    pub fn validate(&self) -> Result<()> {
        if self.copies == Some(0) {
            return Err(LabelError::InvalidInput("copies must be at least 1".into()));
        }
        if let Some(mm) = self.feed_after_mm
            && !(mm.is_finite() && mm >= 0.0)
        {
            return Err(LabelError::InvalidInput(format!(
                "feed_after_mm must be a non-negative number, got {mm}"
            )));
        }
        Ok(())
    }

    /// Apply configured defaults.
    ///
    /// Blank `media`, `title` and `job_options` count as not supplied; a
    /// supplied `feed_after_mm` wins even when it is zero. A blank configured
    /// media or option block is used as is.
    pub fn resolve(&self, settings: &PluginSettings) -> JobParameters {
        JobParameters {
            title: non_blank(&self.title).unwrap_or(DEFAULT_TITLE).to_owned(),
            copies: self.copies.unwrap_or(1),
            media: non_blank(&self.media)
                .unwrap_or(settings.default_media.as_str())
                .to_owned(),
            feed_after_mm: self.feed_after_mm.unwrap_or(settings.default_feed_after_mm),
            job_options: non_blank(&self.job_options)
                .unwrap_or(settings.job_options.as_str())
                .to_owned(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// One print call: the document and its options.
#[derive(Debug, Default)]
pub struct PrintRequest {
    pub payload: Option<LabelPayload>,
    pub options: PrintOptions,
}

impl PrintRequest {
    pub fn new(payload: impl Into<LabelPayload>, options: PrintOptions) -> Self {
        Self {
            payload: Some(payload.into()),
            options,
        }
    }

    /// Build a request from host keyword arguments.
    ///
    /// The document is the first non-empty value among [`PAYLOAD_KEYS`];
    /// options come from `printing_options`.
    pub fn from_kwargs(kwargs: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let payload_value = PAYLOAD_KEYS
            .iter()
            .filter_map(|key| kwargs.get(*key))
            .find(|value| is_truthy(value));
        let payload = match payload_value {
            Some(value) => LabelPayload::from_json(value)?,
            None => None,
        };

        let options = match kwargs.get("printing_options") {
            None | Some(serde_json::Value::Null) => PrintOptions::default(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                LabelError::InvalidInput(format!("invalid printing options: {e}"))
            })?,
        };

        Ok(Self { payload, options })
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
    }
}

/// Prints labels to the configured CUPS queue.
pub struct LabelPrinter {
    settings: Arc<dyn SettingsStore>,
    registry: Arc<AttributeTagRegistry>,
    submitter: Arc<dyn JobSubmitter>,
}

impl LabelPrinter {
    /// A printer submitting over IPP with a freshly seeded tag registry.
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        let registry = Arc::new(AttributeTagRegistry::with_defaults());
        let submitter = Arc::new(IppSubmitter::new(Arc::clone(&registry)));
        Self {
            settings,
            registry,
            submitter,
        }
    }

    /// A printer with a caller-supplied registry and submitter.
    pub fn with_submitter(
        settings: Arc<dyn SettingsStore>,
        registry: Arc<AttributeTagRegistry>,
        submitter: Arc<dyn JobSubmitter>,
    ) -> Self {
        Self {
            settings,
            registry,
            submitter,
        }
    }

    pub fn registry(&self) -> &Arc<AttributeTagRegistry> {
        &self.registry
    }

    /// Build the Print-Job for `request` without submitting it.
    pub fn prepare(&self, request: PrintRequest) -> Result<PrintJobRequest> {
        request.options.validate()?;
        let settings = PluginSettings::resolve(self.settings.as_ref())?;
        let params = request.options.resolve(&settings);
        let destination = settings.destination();

        info!(
            uri = %destination.uri(),
            media = %params.media,
            copies = params.copies,
            title = %params.title,
            feed_after_mm = params.feed_after_mm,
            job_options = %params.job_options,
            "label print requested"
        );

        let document = normalize(request.payload)?;
        let assembler = JobRequestAssembler::new(destination, Arc::clone(&self.registry));
        Ok(assembler.assemble(&params, document))
    }

    /// Print one label, blocking until the queue has accepted it.
    #[instrument(skip_all)]
    pub fn print_label(&self, request: PrintRequest) -> Result<()> {
        let job = self.prepare(request)?;
        let job_id = job.id;
        let fingerprint = hash_bytes(&job.document);

        if let Err(e) = self.submitter.submit(job) {
            error!(job = %job_id, error = %e, "ipp print failed");
            return Err(LabelError::SubmissionFailure(format!("IPP print failed: {e}")));
        }

        info!(job = %job_id, sha256 = %fingerprint, "ipp submitted successfully");
        Ok(())
    }
}
