// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a tokenizer model as understood by the remote service.
///
/// Hugging Face style ids (`org/name`) are accepted as-is; the only requirement is that the id is
/// non-empty after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId {
    value: String,
}

impl ModelId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelIdError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelIdError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ModelIdError::ContainsWhitespace);
        }
        let value = if trimmed.len() == value.len() { value } else { trimmed.to_owned() };
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ModelId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ModelId {
    type Err = ModelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for ModelId {
    type Error = ModelIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(value: ModelId) -> Self {
        value.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelIdError {
    #[error("model id must not be empty")]
    Empty,
    #[error("model id must not contain whitespace")]
    ContainsWhitespace,
}

#[cfg(test)]
mod tests {
    use super::{ModelId, ModelIdError};

    #[test]
    fn model_id_rejects_empty() {
        assert_eq!(ModelId::new(""), Err(ModelIdError::Empty));
        assert_eq!(ModelId::new("   "), Err(ModelIdError::Empty));
    }

    #[test]
    fn model_id_rejects_inner_whitespace() {
        assert_eq!(ModelId::new("bert base"), Err(ModelIdError::ContainsWhitespace));
    }

    #[test]
    fn model_id_accepts_namespaced_ids_and_trims() {
        let id = ModelId::new("  Qwen/Qwen2.5-0.5B ").expect("model id");
        assert_eq!(id.as_str(), "Qwen/Qwen2.5-0.5B");
    }

    #[test]
    fn model_id_serializes_as_plain_string() {
        let id = ModelId::new("gpt2").expect("model id");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"gpt2\"");

        let err = serde_json::from_str::<ModelId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
