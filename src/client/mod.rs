//! HTTP client for the permanode store backend.
//!
//! The store exposes signing discovery, attribute search, permanode
//! creation, and attribute claims. Everything here is a thin wrapper over
//! those endpoints; the signing and indexing machinery lives server-side.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::blobref::BlobRef;
use crate::config::Settings;

/// Attribute name used for collection membership claims.
pub const MEMBER_ATTR: &str = "camliMember";

/// Signing configuration discovered from the store.
#[derive(Debug, Clone, Deserialize)]
pub struct SigConfig {
    /// Blob ref of the public key used to sign claims; the search index is
    /// keyed by it.
    #[serde(rename = "publicKeyBlobRef")]
    pub public_key_blob_ref: BlobRef,
}

/// One search hit: a permanode carrying the matched attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct AttrHit {
    pub permanode: BlobRef,
}

/// Described blob metadata keyed off a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlobMeta {
    /// Attribute name -> values, as claimed on the permanode.
    #[serde(default)]
    pub attr: HashMap<String, Vec<String>>,
}

/// Response of an attribute search. Hits arrive in index order; `meta`
/// describes the referenced blobs so the UI can label them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "withAttr", default)]
    pub with_attr: Vec<AttrHit>,
    #[serde(default)]
    pub meta: HashMap<String, BlobMeta>,
}

impl SearchResult {
    /// Resolve a display title for a permanode: its `title` attribute if
    /// the response described one, otherwise the abbreviated ref.
    pub fn title_of(&self, permanode: &BlobRef) -> String {
        self.meta
            .get(permanode.as_str())
            .and_then(|m| m.attr.get("title"))
            .and_then(|titles| titles.first())
            .cloned()
            .unwrap_or_else(|| permanode.short())
    }
}

/// Errors that can occur talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("store returned HTTP {0}")]
    Status(u16),
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

/// Store operations needed by the search page.
///
/// Controllers take `&dyn PermanodeStore` so tests can substitute an
/// in-process fake for the HTTP client.
#[async_trait]
pub trait PermanodeStore: Send + Sync {
    /// Discover the signing configuration (public key ref).
    async fn sig_discovery(&self) -> Result<SigConfig, StoreError>;

    /// Search for permanodes carrying `attr == value` signed by `signer`.
    /// An empty `attr` searches across all attributes. `fuzzy` is passed
    /// through to the index as-is.
    async fn permanodes_with_attr(
        &self,
        signer: &BlobRef,
        attr: &str,
        value: &str,
        fuzzy: &str,
    ) -> Result<SearchResult, StoreError>;

    /// Create a new (empty) permanode and return its ref.
    async fn create_permanode(&self) -> Result<BlobRef, StoreError>;

    /// Claim `child` as a member of the `parent` collection.
    async fn add_member(&self, parent: &BlobRef, child: &BlobRef) -> Result<(), StoreError>;
}

/// reqwest-backed client for a running store server.
pub struct StoreClient {
    base: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(rename = "blobRef")]
    blob_ref: BlobRef,
}

impl StoreClient {
    /// Create a client from settings.
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.request_timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base: settings.store_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(StoreError::Status(resp.status().as_u16()))
        }
    }
}

#[async_trait]
impl PermanodeStore for StoreClient {
    async fn sig_discovery(&self) -> Result<SigConfig, StoreError> {
        let resp = self
            .client
            .get(self.url("/camli/sig/discovery"))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn permanodes_with_attr(
        &self,
        signer: &BlobRef,
        attr: &str,
        value: &str,
        fuzzy: &str,
    ) -> Result<SearchResult, StoreError> {
        debug!(signer = %signer, attr, value, fuzzy, "attribute search");
        let resp = self
            .client
            .get(self.url("/camli/search/permanodeattr"))
            .query(&[
                ("signer", signer.as_str()),
                ("attr", attr),
                ("value", value),
                ("fuzzy", fuzzy),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create_permanode(&self) -> Result<BlobRef, StoreError> {
        let resp = self
            .client
            .post(self.url("/camli/permanode"))
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let created: CreateResponse = Self::check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(created.blob_ref)
    }

    async fn add_member(&self, parent: &BlobRef, child: &BlobRef) -> Result<(), StoreError> {
        debug!(parent = %parent, child = %child, "add member claim");
        let resp = self
            .client
            .post(self.url("/camli/claim"))
            .form(&[
                ("permanode", parent.as_str()),
                ("attr", MEMBER_ATTR),
                ("value", child.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::check_status(resp).await?;
        Ok(())
    }
}
