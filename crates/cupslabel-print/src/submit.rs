// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job submission boundary.
//
// The host waits for the outcome of every print call, so submission is a
// plain blocking function. The IPP implementation runs the async client to
// completion on a private current-thread runtime created for the call.

use std::sync::Arc;

use tracing::debug;

use cupslabel_core::error::{LabelError, Result};
use cupslabel_core::tags::AttributeTagRegistry;
use cupslabel_core::types::PrintJobRequest;

use crate::ipp_client::IppClient;

/// Hands an assembled request to a print server.
pub trait JobSubmitter: Send + Sync {
    /// Submit `request` and block until the server has accepted or rejected it.
    fn submit(&self, request: PrintJobRequest) -> Result<()>;
}

/// Submits Print-Job requests over IPP.
///
/// Calling it from a thread that is already driving a Tokio runtime fails
/// with [`LabelError::SubmissionFailure`].
#[derive(Debug, Clone)]
pub struct IppSubmitter {
    registry: Arc<AttributeTagRegistry>,
}

impl IppSubmitter {
    pub fn new(registry: Arc<AttributeTagRegistry>) -> Self {
        Self { registry }
    }
}

impl JobSubmitter for IppSubmitter {
    fn submit(&self, request: PrintJobRequest) -> Result<()> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(LabelError::SubmissionFailure(
                "cannot block on IPP submission from inside an async runtime".into(),
            ));
        }

        let client = IppClient::new(&request.destination_uri)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LabelError::SubmissionFailure(format!("failed to start runtime: {e}")))?;

        let job_id = runtime.block_on(client.print_job(request, &self.registry))?;
        debug!(?job_id, "submission complete");
        Ok(())
    }
}
