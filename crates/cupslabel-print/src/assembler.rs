// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job request assembly.
//
// Attribute precedence, lowest to highest:
//   1. job-name / copies
//   2. free-text job options
//   3. feed attributes
//   4. media (only when one was resolved)

use std::sync::Arc;

use tracing::debug;

use cupslabel_core::tags::AttributeTagRegistry;
use cupslabel_core::types::{JobAttributes, PrintJobRequest, PrinterDestination};
use cupslabel_document::MediaResolver;

use crate::feed::FeedPolicy;
use crate::options::parse_job_options;

/// Effective per-call job parameters, after defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameters {
    pub title: String,
    pub copies: u32,
    pub media: String,
    pub feed_after_mm: f64,
    pub job_options: String,
}

/// Builds [`PrintJobRequest`]s for one destination queue.
#[derive(Debug, Clone)]
pub struct JobRequestAssembler {
    destination: PrinterDestination,
    registry: Arc<AttributeTagRegistry>,
    media: MediaResolver,
}

impl JobRequestAssembler {
    pub fn new(destination: PrinterDestination, registry: Arc<AttributeTagRegistry>) -> Self {
        Self {
            destination,
            registry,
            media: MediaResolver::new(),
        }
    }

    pub fn destination(&self) -> &PrinterDestination {
        &self.destination
    }

    /// Combine parameters and document into a request.
    pub fn assemble(&self, params: &JobParameters, document: Vec<u8>) -> PrintJobRequest {
        let media = self.media.resolve(&params.media, &document);
        let attrs = build_attributes(params, &media, &self.registry);
        debug!(attributes = attrs.len(), media = %media, "job attributes assembled");
        PrintJobRequest::new(self.destination.uri(), attrs, document)
    }
}

/// Merge the attribute sources in precedence order.
pub fn build_attributes(
    params: &JobParameters,
    resolved_media: &str,
    registry: &AttributeTagRegistry,
) -> JobAttributes {
    let mut attrs = JobAttributes::new();
    attrs.set("job-name", params.title.as_str());
    attrs.set("copies", params.copies);

    attrs.merge(parse_job_options(&params.job_options, registry));
    attrs.merge(FeedPolicy::from_mm(params.feed_after_mm).to_attributes());

    if !resolved_media.is_empty() {
        attrs.set("media", resolved_media);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use cupslabel_core::types::AttributeValue;

    fn params() -> JobParameters {
        JobParameters {
            title: "inventree-label".into(),
            copies: 1,
            media: String::new(),
            feed_after_mm: 0.0,
            job_options: String::new(),
        }
    }

    #[test]
    fn base_attributes() {
        let registry = AttributeTagRegistry::with_defaults();
        let attrs = build_attributes(&params(), "", &registry);
        assert_eq!(attrs.get("job-name"), Some(&AttributeValue::from("inventree-label")));
        assert_eq!(attrs.get("copies"), Some(&AttributeValue::Integer(1)));
        assert_eq!(attrs.get("FeedWhere"), Some(&AttributeValue::from("None")));
        assert!(!attrs.contains("media"));
    }

    #[test]
    fn job_options_override_base() {
        let registry = AttributeTagRegistry::with_defaults();
        let p = JobParameters {
            job_options: "copies=3\njob-name=override".into(),
            ..params()
        };
        let attrs = build_attributes(&p, "", &registry);
        assert_eq!(attrs.get("copies"), Some(&AttributeValue::Integer(3)));
        assert_eq!(attrs.get("job-name"), Some(&AttributeValue::from("override")));
    }

    #[test]
    fn feed_overrides_job_options() {
        let registry = AttributeTagRegistry::with_defaults();
        let p = JobParameters {
            job_options: "FeedWhere=BeforeJob,FeedDist=9feed30mm".into(),
            feed_after_mm: 7.0,
            ..params()
        };
        let attrs = build_attributes(&p, "", &registry);
        assert_eq!(attrs.get("FeedWhere"), Some(&AttributeValue::from("AfterJob")));
        assert_eq!(attrs.get("FeedDist"), Some(&AttributeValue::from("1feed6mm")));
    }

    #[test]
    fn disabled_feed_keeps_optioned_distance() {
        let registry = AttributeTagRegistry::with_defaults();
        let p = JobParameters {
            job_options: "FeedDist=2feed9mm".into(),
            ..params()
        };
        let attrs = build_attributes(&p, "", &registry);
        assert_eq!(attrs.get("FeedWhere"), Some(&AttributeValue::from("None")));
        assert_eq!(attrs.get("FeedDist"), Some(&AttributeValue::from("2feed9mm")));
    }

    #[test]
    fn resolved_media_wins() {
        let registry = AttributeTagRegistry::with_defaults();
        let p = JobParameters {
            job_options: "media=iso_a4_210x297mm".into(),
            ..params()
        };
        let attrs = build_attributes(&p, "Custom.48x30mm", &registry);
        assert_eq!(attrs.get("media"), Some(&AttributeValue::from("Custom.48x30mm")));

        let attrs = build_attributes(&p, "", &registry);
        assert_eq!(attrs.get("media"), Some(&AttributeValue::from("iso_a4_210x297mm")));
    }

    #[test]
    fn assemble_targets_queue_uri() {
        let assembler = JobRequestAssembler::new(
            PrinterDestination::new("portterm", 631, "devterm_printer"),
            Arc::new(AttributeTagRegistry::with_defaults()),
        );
        let p = JobParameters {
            media: "Custom.48x30mm".into(),
            ..params()
        };
        let request = assembler.assemble(&p, b"%PDF-1.4".to_vec());
        assert_eq!(request.destination_uri, "ipp://portterm:631/printers/devterm_printer");
        assert_eq!(request.document_format, "application/pdf");
        assert_eq!(request.document, b"%PDF-1.4");
        assert_eq!(
            request.job_attributes.get("media"),
            Some(&AttributeValue::from("Custom.48x30mm"))
        );
    }
}
