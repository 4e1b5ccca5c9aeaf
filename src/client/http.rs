// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    DecodeRequest, DecodeResponse, TokenizeRequest, TokenizeResponse, TokenizerClient, DECODE_PATH,
    TOKENIZE_PATH,
};
use crate::error::RequestError;

/// Error body of a non-success response. FastAPI-style services send a string `detail`, but
/// validation failures carry a structured value; those are surfaced as their JSON text.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(detail) => Some(detail),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTokenizerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTokenizerClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| RequestError::transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Self { http, endpoint }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "posting to tokenizer service");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| RequestError::transport(format!("Request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.bytes().await {
                Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
                    .ok()
                    .and_then(ErrorBody::into_detail),
                Err(_) => None,
            };
            return Err(RequestError::server(status.as_u16(), detail));
        }

        response.json::<R>().await.map_err(|err| {
            RequestError::transport(format!("Malformed response from {url}: {err}"))
        })
    }
}

#[async_trait]
impl TokenizerClient for HttpTokenizerClient {
    async fn tokenize(&self, request: &TokenizeRequest) -> Result<TokenizeResponse, RequestError> {
        self.post(TOKENIZE_PATH, request).await
    }

    async fn decode(&self, request: &DecodeRequest) -> Result<DecodeResponse, RequestError> {
        self.post(DECODE_PATH, request).await
    }
}
