// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async IPP client for CUPS queues.
//
// Uses the `ipp` crate's async API to send a Print-Job (RFC 8011 §4.2.1).
// Job attributes are tagged according to the attribute tag registry so that
// PPD options reach the CUPS filter chain with the type it expects.

use std::io::Cursor;

use chrono::Utc;
use ipp::prelude::*;
use tracing::{debug, error, info, instrument};

use cupslabel_core::error::{LabelError, Result};
use cupslabel_core::tags::{AttributeTagRegistry, WireTag};
use cupslabel_core::types::{AttributeValue, PrintJobRequest};

/// Async IPP client wrapping the `ipp` crate.
///
/// Each instance is bound to a single queue URI. All methods are async and
/// require a Tokio runtime.
pub struct IppClient {
    /// The target queue URI (ipp:// or ipps://).
    uri: Uri,
}

impl IppClient {
    /// Create a new client targeting the given queue URI.
    pub fn new(uri: &str) -> Result<Self> {
        let parsed: Uri = uri
            .parse()
            .map_err(|e| LabelError::SubmissionFailure(format!("invalid URI '{uri}': {e}")))?;
        Ok(Self { uri: parsed })
    }

    /// Return the queue URI this client is targeting.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Submit the request as a Print-Job.
    ///
    /// Returns the job-id assigned by CUPS when the response carries one.
    #[instrument(skip_all, fields(uri = %self.uri, job = %request.id))]
    pub async fn print_job(
        &self,
        request: PrintJobRequest,
        registry: &AttributeTagRegistry,
    ) -> Result<Option<i32>> {
        let job_name = request
            .job_attributes
            .get("job-name")
            .map(|v| v.to_string())
            .unwrap_or_default();
        let created_at = request.created_at;
        let attributes = job_attributes(&request, registry);
        let payload = IppPayload::new(Cursor::new(request.document));

        let operation = IppOperationBuilder::print_job(self.uri.clone(), payload)
            .job_title(&job_name)
            .document_format(request.document_format)
            .attributes(attributes)
            .build();

        let client = AsyncIppClient::new(self.uri.clone());

        info!(mime = request.document_format, "sending Print-Job");
        let response = client
            .send(operation)
            .await
            .map_err(|e| LabelError::SubmissionFailure(format!("Print-Job: {e}")))?;

        if !response.header().status_code().is_success() {
            let code = response.header().status_code();
            error!(status = ?code, "Print-Job failed");
            return Err(LabelError::SubmissionFailure(format!(
                "Print-Job returned status {code:?}"
            )));
        }

        let job_id = extract_job_id(response.attributes());
        let elapsed_ms = (Utc::now() - created_at).num_milliseconds();
        info!(job_id, elapsed_ms, "print job accepted by CUPS");
        Ok(job_id)
    }
}

// ---------------------------------------------------------------------------
// Attribute encoding
// ---------------------------------------------------------------------------

/// Encode the job-group attributes of a request.
///
/// `job-name` is sent as the operation attribute via the builder and is not
/// repeated here.
pub fn job_attributes(request: &PrintJobRequest, registry: &AttributeTagRegistry) -> Vec<IppAttribute> {
    request
        .job_attributes
        .iter()
        .filter(|(name, _)| *name != "job-name")
        .map(|(name, value)| {
            let ipp_value = match registry.tag_for(name) {
                Some(tag) => encode_value(value, tag),
                None => natural_value(value),
            };
            debug!(attribute = name, value = %ipp_value, "encoded job attribute");
            IppAttribute::new(name, ipp_value)
        })
        .collect()
}

/// Encode `value` with `tag`, falling back to the value's own type when it
/// cannot be represented under that tag.
pub fn encode_value(value: &AttributeValue, tag: WireTag) -> IppValue {
    match (tag, value) {
        (WireTag::Boolean, AttributeValue::Boolean(b)) => IppValue::Boolean(*b),
        (WireTag::Integer, AttributeValue::Integer(n)) => match i32::try_from(*n) {
            Ok(n) => IppValue::Integer(n),
            Err(_) => keyword(value),
        },
        (WireTag::Enum, AttributeValue::Integer(n)) => match i32::try_from(*n) {
            Ok(n) => IppValue::Enum(n),
            Err(_) => keyword(value),
        },
        (WireTag::Keyword, AttributeValue::Text(_) | AttributeValue::Integer(_)) => keyword(value),
        (WireTag::NameWithoutLanguage, _) => IppValue::NameWithoutLanguage(value.to_string().into()),
        (WireTag::TextWithoutLanguage, _) => IppValue::TextWithoutLanguage(value.to_string().into()),
        _ => natural_value(value),
    }
}

/// Encoding for attributes with no registered tag.
pub fn natural_value(value: &AttributeValue) -> IppValue {
    match value {
        AttributeValue::Boolean(b) => IppValue::Boolean(*b),
        AttributeValue::Integer(n) => match i32::try_from(*n) {
            Ok(n) => IppValue::Integer(n),
            Err(_) => keyword(value),
        },
        AttributeValue::Text(_) => keyword(value),
    }
}

fn keyword(value: &AttributeValue) -> IppValue {
    IppValue::Keyword(value.to_string().into())
}

/// Extract the `job-id` integer from a response's Job Attributes group.
fn extract_job_id(attrs: &IppAttributes) -> Option<i32> {
    for group in attrs.groups_of(DelimiterTag::JobAttributes) {
        if let Some(attr) = group.attributes().get("job-id")
            && let IppValue::Integer(id) = attr.value()
        {
            return Some(*id);
        }
    }
    None
}
