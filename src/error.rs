// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Failure taxonomy for calls against the tokenizer service.

use thiserror::Error;

/// Generic message used when a non-success response carries no usable `detail`.
pub(crate) fn generic_failure_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The service could not be reached, did not answer in time, or answered with a body that
    /// does not match the contract.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status; `detail` is surfaced verbatim.
    #[error("{detail}")]
    Server { status: u16, detail: String },
}

impl RequestError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn server(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| generic_failure_message(status));
        Self::Server { status, detail }
    }

    /// Message shown in the status line.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
