//! HTTP implementation of the backend traits using reqwest

use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use url::Url;

use impanel_core::{
    CatalogIndex, CatalogSource, Comment, CommentDraft, CommentId, CommentStore, DocumentUpload,
    FetchError, ImpanelConfig, UploadedDocument,
};

use crate::wire::CatalogPayload;

/// Client for the review backend REST API
///
/// `base_url` is the server root, e.g. `http://127.0.0.1:5000`; trailing
/// slashes are stripped. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct UploadReply {
    filename: String,
}

impl ReviewClient {
    /// Client with the default 30 second request timeout
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|_| FetchError::InvalidUrl {
            url: base_url.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Client configured from the backend section of [`ImpanelConfig`]
    pub fn from_config(config: &ImpanelConfig) -> Result<Self, FetchError> {
        Self::with_timeout(
            &config.backend.base_url,
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_network_error(e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Transport {
                message: format!("connection failed: {}", e),
            }
        } else {
            FetchError::Transport {
                message: e.to_string(),
            }
        }
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        Self::check_status(response)?
            .json()
            .await
            .map_err(|e| FetchError::Decode {
                message: e.to_string(),
            })
    }
}

impl CatalogSource for ReviewClient {
    async fn fetch_catalog(&self) -> Result<CatalogIndex, FetchError> {
        let url = format!("{}/wireframe", self.base_url);
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_network_error)?;
        let payload: CatalogPayload = Self::decode(response).await?;
        payload.into_index()
    }
}

impl CommentStore for ReviewClient {
    async fn list_comments(
        &self,
        project: &str,
        device: &str,
    ) -> Result<Vec<Comment>, FetchError> {
        let url = format!("{}/comments", self.base_url);
        tracing::debug!("GET {} for {}/{}", url, project, device);
        let response = self
            .client
            .get(&url)
            .query(&[("project", project), ("device", device)])
            .send()
            .await
            .map_err(Self::map_network_error)?;
        Self::decode(response).await
    }

    async fn create_comment(&self, draft: &CommentDraft) -> Result<Comment, FetchError> {
        let url = format!("{}/add_comment", self.base_url);
        tracing::debug!("POST {} for {}", url, draft.scope());
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(Self::map_network_error)?;
        Self::decode(response).await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), FetchError> {
        let url = format!("{}/comment/{}", self.base_url, id);
        tracing::debug!("DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(Self::map_network_error)?;
        Self::check_status(response)?;
        Ok(())
    }
}

impl DocumentUpload for ReviewClient {
    async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedDocument, FetchError> {
        let url = format!("{}/upload_pdf", self.base_url);
        tracing::debug!("POST {} ({} bytes)", url, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_network_error)?;
        let reply: UploadReply = Self::decode(response).await?;
        Ok(UploadedDocument::new(reply.filename))
    }
}
