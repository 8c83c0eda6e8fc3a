// src/services/bsky.rs

//! Bluesky XRPC client and post publishing.
//!
//! A thin client over the atproto HTTP API, covering exactly the four
//! endpoints the bot needs: `createSession`, `createRecord`, `uploadBlob`
//! and `resolveHandle`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{
    BlobRef, ByteSlice, Config, Credentials, Facet, FacetFeature, FeedItem, PostReceipt,
    PostRecord, Session, POST_RECORD_TYPE,
};
use crate::services::{embed, Publisher};
use crate::utils::richtext::{self, SpanKind};

/// Error body returned by XRPC endpoints on failure.
#[derive(Debug, Default, Deserialize)]
struct XrpcErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Authenticated client for a Bluesky service endpoint.
pub struct BskyAgent {
    client: reqwest::Client,
    service: String,
    session: Option<Session>,
}

impl BskyAgent {
    /// Create an agent for the given service endpoint.
    pub fn new(client: reqwest::Client, service: impl Into<String>) -> Self {
        Self {
            client,
            service: service.into(),
            session: None,
        }
    }

    /// The underlying HTTP client, shared with other services.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// The active session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn xrpc_url(&self, nsid: &str) -> String {
        format!("{}/xrpc/{}", self.service.trim_end_matches('/'), nsid)
    }

    fn auth_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::auth("not logged in"))
    }

    /// Turn a non-success response into an API error with the server's
    /// message attached.
    async fn check(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let message = resp
            .json::<XrpcErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| "unknown error".to_string());
        Err(AppError::api(endpoint, status, message))
    }

    /// Authenticate and store the session.
    ///
    /// Any failure here is fatal for the run, so every error path maps to
    /// an authentication error.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let endpoint = "com.atproto.server.createSession";
        let resp = self
            .client
            .post(self.xrpc_url(endpoint))
            .json(&serde_json::json!({
                "identifier": credentials.identifier,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(AppError::auth)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<XrpcErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(AppError::auth(format!("{} ({})", message, status)));
        }

        let session: Session = resp.json().await.map_err(AppError::auth)?;
        log::debug!("Logged in as {} ({})", session.handle, session.did);
        self.session = Some(session);
        Ok(())
    }

    /// Resolve a handle to its DID.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Resolved {
            did: String,
        }

        let endpoint = "com.atproto.identity.resolveHandle";
        let resp = self
            .client
            .get(self.xrpc_url(endpoint))
            .query(&[("handle", handle)])
            .send()
            .await?;
        let resp = Self::check(endpoint, resp).await?;
        Ok(resp.json::<Resolved>().await?.did)
    }

    /// Upload raw bytes as a blob and return its reference.
    pub async fn upload_blob(&self, bytes: Vec<u8>, content_type: &str) -> Result<BlobRef> {
        #[derive(Deserialize)]
        struct Uploaded {
            blob: BlobRef,
        }

        let session = self.auth_session()?;
        let endpoint = "com.atproto.repo.uploadBlob";
        let resp = self
            .client
            .post(self.xrpc_url(endpoint))
            .bearer_auth(&session.access_jwt)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let resp = Self::check(endpoint, resp).await?;
        Ok(resp.json::<Uploaded>().await?.blob)
    }

    /// Create a post record in the session repo.
    pub async fn create_post(&self, record: &PostRecord) -> Result<PostReceipt> {
        let session = self.auth_session()?;
        let endpoint = "com.atproto.repo.createRecord";
        let resp = self
            .client
            .post(self.xrpc_url(endpoint))
            .bearer_auth(&session.access_jwt)
            .json(&serde_json::json!({
                "repo": session.did,
                "collection": POST_RECORD_TYPE,
                "record": record,
            }))
            .send()
            .await?;
        let resp = Self::check(endpoint, resp).await?;
        Ok(resp.json::<PostReceipt>().await?)
    }

    /// Detect rich-text facets in the post text.
    ///
    /// Link spans become link facets directly; mention spans are resolved
    /// to DIDs through the service and silently dropped when resolution
    /// fails.
    pub async fn detect_facets(&self, text: &str) -> Vec<Facet> {
        let mut facets = Vec::new();
        for span in richtext::find_spans(text) {
            let feature = match span.kind {
                SpanKind::Link(uri) => FacetFeature::Link { uri },
                SpanKind::Mention(handle) => match self.resolve_handle(&handle).await {
                    Ok(did) => FacetFeature::Mention { did },
                    Err(e) => {
                        log::debug!("Skipping mention @{}: {}", handle, e);
                        continue;
                    }
                },
            };
            facets.push(Facet {
                index: ByteSlice {
                    byte_start: span.start,
                    byte_end: span.end,
                },
                features: vec![feature],
            });
        }
        facets
    }
}

/// Publishes feed items as Bluesky posts.
pub struct BskyPublisher {
    agent: BskyAgent,
    config: Arc<Config>,
}

impl BskyPublisher {
    /// Create a publisher from a logged-in agent.
    pub fn new(agent: BskyAgent, config: Arc<Config>) -> Self {
        Self { agent, config }
    }

    /// The wrapped agent.
    pub fn agent(&self) -> &BskyAgent {
        &self.agent
    }
}

#[async_trait]
impl Publisher for BskyPublisher {
    async fn publish(&self, item: &FeedItem) -> Result<PostReceipt> {
        let text = richtext::compose(item);
        let text = richtext::truncate_graphemes(&text, self.config.post.max_graphemes);
        let facets = self.agent.detect_facets(&text).await;
        let embed =
            embed::build_external_embed(&self.agent, &self.config.embed, &item.link).await;

        let record = PostRecord {
            record_type: POST_RECORD_TYPE.to_string(),
            text,
            facets,
            embed,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            langs: self.config.post.langs.clone(),
        };
        log::debug!(
            "Record: {}",
            serde_json::to_string(&record).unwrap_or_default()
        );

        self.agent.create_post(&record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> BskyAgent {
        BskyAgent::new(reqwest::Client::new(), "https://bsky.social")
    }

    #[test]
    fn test_xrpc_url() {
        assert_eq!(
            agent().xrpc_url("com.atproto.server.createSession"),
            "https://bsky.social/xrpc/com.atproto.server.createSession"
        );
    }

    #[test]
    fn test_xrpc_url_trims_trailing_slash() {
        let agent = BskyAgent::new(reqwest::Client::new(), "https://pds.example/");
        assert_eq!(
            agent.xrpc_url("com.atproto.repo.createRecord"),
            "https://pds.example/xrpc/com.atproto.repo.createRecord"
        );
    }

    #[test]
    fn test_methods_require_login() {
        assert!(agent().auth_session().is_err());
    }

    #[tokio::test]
    async fn test_detect_facets_links_only() {
        // Link facets need no network; mentions would.
        let text = "a post about https://example.com/article";
        let facets = agent().detect_facets(text).await;
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].index.byte_start, 13);
        assert_eq!(facets[0].index.byte_end, text.len());
        assert_eq!(
            facets[0].features[0],
            FacetFeature::Link {
                uri: "https://example.com/article".to_string()
            }
        );
    }
}
