// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Async dispatch of [`ApiCall`]s.
//!
//! Calls run as tokio tasks and report back over an unbounded channel; they never touch session
//! state. The owner drains [`Completion`]s on its own thread and applies them through the
//! session's generation check. Superseded calls are left running and simply discarded later.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::{ApiCall, Completion};
use crate::client::{ApiRequest, ApiResponse, TokenizerClient};
use crate::error::RequestError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RequestPipeline {
    client: Arc<dyn TokenizerClient>,
    timeout: Duration,
    handle: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl RequestPipeline {
    pub fn new(client: Arc<dyn TokenizerClient>, timeout: Duration, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { client, timeout, handle, tx, rx }
    }

    /// Builds a pipeline on the runtime of the calling task.
    pub fn on_current_runtime(client: Arc<dyn TokenizerClient>, timeout: Duration) -> Self {
        Self::new(client, timeout, Handle::current())
    }

    pub fn dispatch(&self, call: ApiCall) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let timeout = self.timeout;

        tracing::debug!(
            generation = %call.generation,
            mode = %call.request.mode(),
            model = %call.request.model_id(),
            "dispatching tokenizer request"
        );

        self.handle.spawn(async move {
            let result = run_with_timeout(client.as_ref(), &call.request, timeout).await;
            if let Err(err) = &result {
                tracing::warn!(generation = %call.generation, error = %err, "tokenizer request failed");
            }
            // The receiver only disappears when the owner shuts down.
            let _ = tx.send(Completion { generation: call.generation, result });
        });
    }

    /// Returns a finished completion without waiting.
    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

pub async fn run_with_timeout(
    client: &dyn TokenizerClient,
    request: &ApiRequest,
    timeout: Duration,
) -> Result<ApiResponse, RequestError> {
    match tokio::time::timeout(timeout, client.execute(request)).await {
        Ok(result) => result,
        Err(_) => Err(RequestError::transport(format!(
            "Request timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}
