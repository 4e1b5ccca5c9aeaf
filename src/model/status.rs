// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Ready,
    Progress,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "ready",
            Self::Progress => "progress",
            Self::Error => "error",
        })
    }
}

/// User-visible request status plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    kind: StatusKind,
    message: String,
}

impl Status {
    pub fn ready(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Ready, message: message.into() }
    }

    pub fn progress(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Progress, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, message: message.into() }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ready(&self) -> bool {
        self.kind == StatusKind::Ready
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ready("Ready")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
