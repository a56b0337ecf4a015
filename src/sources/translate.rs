//! Synopsis translation through a LibreTranslate-compatible endpoint
//!
//! `POST {endpoint}` with `{"q", "source", "target", "format": "text"}`,
//! answered by `{"translatedText": "..."}`.

use crate::config::TranslateConfig;
use crate::crawler::{check_status, classify_error, FetchError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Cheap to clone; clones share the underlying connection pool
#[derive(Debug, Clone)]
pub struct Translator {
    client: Client,
    endpoint: String,
    source: String,
    target: String,
}

impl Translator {
    pub fn new(client: Client, config: &TranslateConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            source: config.source.clone(),
            target: config.target.clone(),
        }
    }

    /// Translates one text; no retries, callers fall back to a default
    pub async fn translate(&self, text: &str) -> Result<String, FetchError> {
        let url = self.endpoint.as_str();
        let request = TranslateRequest {
            q: text,
            source: &self.source,
            target: &self.target,
            format: "text",
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_error(url, &e))?;

        check_status(url, response.status())?;

        let body: TranslateResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::NetworkError {
                    url: url.to_string(),
                    message: format!("unexpected translation response: {}", e),
                }
            } else {
                classify_error(url, &e)
            }
        })?;

        Ok(body.translated_text)
    }
}
