use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

use super::auth::GoogleAuthorizer;
use crate::error::{Error, Result};
use crate::services::capabilities::{DocumentPublisher, DocumentReference};

pub const DOCS_API: &str = "https://docs.googleapis.com";
pub const DRIVE_API: &str = "https://www.googleapis.com";

const PROVIDER: &str = "google docs";

pub fn document_url(id: &str) -> String {
    format!("https://docs.google.com/document/d/{}", id)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedDocument {
    document_id: String,
}

/// Publishes text as a new Google Doc shared with anyone holding the link.
pub struct GoogleDocsPublisher {
    client: Client,
    auth: GoogleAuthorizer,
    docs_api: String,
    drive_api: String,
}

impl GoogleDocsPublisher {
    pub fn new(auth: GoogleAuthorizer, timeout: Duration) -> Result<Self> {
        Self::with_endpoints(auth, timeout, DOCS_API, DRIVE_API)
    }

    pub fn with_endpoints(
        auth: GoogleAuthorizer,
        timeout: Duration,
        docs_api: impl Into<String>,
        drive_api: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            auth,
            docs_api: docs_api.into().trim_end_matches('/').to_string(),
            drive_api: drive_api.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, token: &str, url: String, body: serde_json::Value) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(PROVIDER, format!("server returned {}: {}", status, body)));
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentPublisher for GoogleDocsPublisher {
    async fn publish(&mut self, content: &str, title: &str) -> Result<DocumentReference> {
        let token = self.auth.access_token().await?;

        // 1. Create
        let created: CreatedDocument = self
            .post(&token, format!("{}/v1/documents", self.docs_api), json!({ "title": title }))
            .await?
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("malformed create response: {}", e)))?;
        let id = created.document_id;

        // 2. Fill
        let requests = json!({
            "requests": [
                { "insertText": { "location": { "index": 1 }, "text": content } }
            ]
        });
        self.post(&token, format!("{}/v1/documents/{}:batchUpdate", self.docs_api, id), requests)
            .await?;

        // 3. Share
        self.post(
            &token,
            format!("{}/drive/v3/files/{}/permissions?fields=id", self.drive_api, id),
            json!({ "type": "anyone", "role": "writer" }),
        )
        .await?;

        let url = document_url(&id);
        info!("Google Doc created: {}", url);
        Ok(DocumentReference { id, url })
    }
}
