// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The tokenizer capability and its wire shapes.
//!
//! The engine never tokenizes locally; it talks to a remote service through [`TokenizerClient`].
//! [`HttpTokenizerClient`] is the production implementation; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::model::{Mode, ModelId, Token};

mod http;

pub use http::HttpTokenizerClient;

pub const TOKENIZE_PATH: &str = "api/tokenize";
pub const DECODE_PATH: &str = "api/decode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub text: String,
    pub model_id: ModelId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub ids: Vec<i64>,
    pub model_id: ModelId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub text: String,
    pub tokens: Vec<Token>,
}

/// A request in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Tokenize(TokenizeRequest),
    Decode(DecodeRequest),
}

impl ApiRequest {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Tokenize(_) => Mode::Tokenize,
            Self::Decode(_) => Mode::Decode,
        }
    }

    pub fn model_id(&self) -> &ModelId {
        match self {
            Self::Tokenize(request) => &request.model_id,
            Self::Decode(request) => &request.model_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Tokenized(TokenizeResponse),
    Decoded(DecodeResponse),
}

impl ApiResponse {
    pub fn tokens(&self) -> &[Token] {
        match self {
            Self::Tokenized(response) => &response.tokens,
            Self::Decoded(response) => &response.tokens,
        }
    }
}

#[async_trait]
pub trait TokenizerClient: Send + Sync {
    async fn tokenize(&self, request: &TokenizeRequest) -> Result<TokenizeResponse, RequestError>;

    async fn decode(&self, request: &DecodeRequest) -> Result<DecodeResponse, RequestError>;

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, RequestError> {
        match request {
            ApiRequest::Tokenize(request) => self.tokenize(request).await.map(ApiResponse::Tokenized),
            ApiRequest::Decode(request) => self.decode(request).await.map(ApiResponse::Decoded),
        }
    }
}
