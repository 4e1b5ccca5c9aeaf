// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Text in, tokens out. The visualized text mirrors the raw input.
    #[default]
    Tokenize,
    /// Comma-separated ids in, text out. The visualized text comes from the service.
    Decode,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Decode => "decode",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Tokenize => Self::Decode,
            Self::Decode => Self::Tokenize,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode `{0}` (expected `tokenize` or `decode`)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokenize" => Ok(Self::Tokenize),
            "decode" => Ok(Self::Decode),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}
