// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// A token as reported by the tokenizer service.
///
/// `start`/`end` form a half-open character range into the visualized text. Either may be
/// missing (special/control tokens), in which case span-based features skip the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl Token {
    pub fn new(id: i64, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self { id, text: text.into(), start: Some(start), end: Some(end) }
    }

    pub fn unspanned(id: i64, text: impl Into<String>) -> Self {
        Self { id, text: text.into(), start: None, end: None }
    }

    /// Returns the span if both bounds are present and non-empty.
    pub fn span(&self) -> Option<TokenSpan> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some(TokenSpan { start, end }),
            _ => None,
        }
    }
}

/// Half-open `[start, end)` character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn contains(&self, char_index: usize) -> bool {
        self.start <= char_index && char_index < self.end
    }
}
