use crate::core::dispatch::{PasteError, PasteService};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PASTE_URL: &str = "https://www.hastebin.com";

/// Uploads long error reports to a hastebin-compatible paste server.
pub struct HastebinClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    key: String,
}

impl HastebinClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PasteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PasteError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn documents_url(&self) -> String {
        format!("{}/documents", self.base_url)
    }

    fn document_link(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl PasteService for HastebinClient {
    async fn upload(&self, text: &str) -> Result<String, PasteError> {
        let response = self
            .client
            .post(self.documents_url())
            .body(text.to_string())
            .send()
            .await
            .map_err(|e| PasteError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PasteError::BadResponse(format!(
                "status {}",
                response.status()
            )));
        }

        let created: CreatedDocument = response
            .json()
            .await
            .map_err(|e| PasteError::BadResponse(e.to_string()))?;

        if created.key.is_empty() {
            return Err(PasteError::BadResponse("empty document key".to_string()));
        }

        Ok(self.document_link(&created.key))
    }
}
