//! IPFS pinning behind a trait so the upsert workflows can run against a
//! mock in tests and any compatible pinning provider in production.

use crate::error::ProfileError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

const PINATA_UPLOADS_URL: &str = "https://uploads.pinata.cloud";
const PINATA_API_URL: &str = "https://api.pinata.cloud";

/// Content pinning operations used by the profile workflows.
#[cfg_attr(test, mockall::automock)]
pub trait Pinner {
    /// Pin raw file bytes, returning the content id.
    async fn pin_file(&self, name: String, bytes: Vec<u8>) -> Result<String, ProfileError>;

    /// Pin a JSON document, returning the content id.
    async fn pin_json(&self, name: String, json: serde_json::Value)
    -> Result<String, ProfileError>;

    /// Remove a previously pinned content id.
    async fn unpin(&self, cid: String) -> Result<(), ProfileError>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    data: PinnedFile,
}

#[derive(Debug, Deserialize)]
struct PinnedFile {
    cid: String,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    data: FileList,
}

#[derive(Debug, Deserialize)]
struct FileList {
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
}

/// Pinata v3 files API client authenticated with a JWT.
#[derive(Debug, Clone)]
pub struct PinataClient {
    http: reqwest::Client,
    uploads_url: String,
    api_url: String,
    jwt: String,
}

impl PinataClient {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self::with_endpoints(PINATA_UPLOADS_URL, PINATA_API_URL, jwt)
    }

    pub fn with_endpoints(
        uploads_url: impl Into<String>,
        api_url: impl Into<String>,
        jwt: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            uploads_url: uploads_url.into(),
            api_url: api_url.into(),
            jwt: jwt.into(),
        }
    }

    async fn upload(&self, part: Part) -> Result<String, ProfileError> {
        let form = Form::new().part("file", part).text("network", "public");
        let response = self
            .http
            .post(format!("{}/v3/files", self.uploads_url))
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProfileError::Pin(format!(
                "upload rejected with status {}",
                response.status()
            )));
        }
        let body: PinResponse = response.json().await?;
        Ok(body.data.cid)
    }
}

impl Pinner for PinataClient {
    async fn pin_file(&self, name: String, bytes: Vec<u8>) -> Result<String, ProfileError> {
        self.upload(Part::bytes(bytes).file_name(name)).await
    }

    async fn pin_json(
        &self,
        name: String,
        json: serde_json::Value,
    ) -> Result<String, ProfileError> {
        let bytes = serde_json::to_vec(&json)?;
        let part = Part::bytes(bytes).file_name(name).mime_str("application/json")?;
        self.upload(part).await
    }

    async fn unpin(&self, cid: String) -> Result<(), ProfileError> {
        // The delete endpoint is keyed by file id, so look the cid up first.
        let listing: FileListResponse = self
            .http
            .get(format!("{}/v3/files/public", self.api_url))
            .query(&[("cid", cid.as_str())])
            .bearer_auth(&self.jwt)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let Some(entry) = listing.data.files.into_iter().next() else {
            return Err(ProfileError::Pin(format!("no pinned file for cid {cid}")));
        };
        let response = self
            .http
            .delete(format!("{}/v3/files/public/{}", self.api_url, entry.id))
            .bearer_auth(&self.jwt)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProfileError::Pin(format!(
                "unpin rejected with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
