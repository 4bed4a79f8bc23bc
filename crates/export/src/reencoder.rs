//! The re-encoding collaborator: the external service that turns an
//! edited snapshot back into a binary document artifact.

use crate::error::ExportError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

const DEFAULT_ARTIFACT_NAME: &str = "edited.pdf";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The binary artifact returned by the re-encoding service, staged for
/// user retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub suggested_name: String,
}

/// Abstracts the re-encoding service so the session can run against an
/// HTTP endpoint in production and an in-memory fake in tests.
#[async_trait]
pub trait Reencoder: Send + Sync {
    async fn reencode(&self, snapshot: Value) -> Result<ExportArtifact, ExportError>;

    /// A human-readable name for this re-encoder (for logging).
    fn name(&self) -> &'static str;
}

/// Submits snapshots to the re-encoding service over HTTP. A 2xx
/// response body is the binary artifact; a non-2xx response surfaces as
/// a recoverable `Service` error carrying the optional JSON payload.
pub struct HttpReencoder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReencoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Reencoder for HttpReencoder {
    async fn reencode(&self, snapshot: Value) -> Result<ExportArtifact, ExportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&snapshot)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.json::<Value>().await.ok();
            log::warn!("re-encoding service rejected snapshot: status {}", status);
            return Err(ExportError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let suggested_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_disposition_filename)
            .unwrap_or_else(|| DEFAULT_ARTIFACT_NAME.to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(ExportArtifact {
            bytes,
            content_type,
            suggested_name,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn parse_disposition_filename(header: &str) -> Option<String> {
    let marker = "filename=";
    let start = header.find(marker)? + marker.len();
    let raw = header[start..].split(';').next()?.trim();
    let name = raw.trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

/// An in-memory re-encoder for tests: records every submitted snapshot
/// and returns a canned response.
#[derive(Default)]
pub struct InMemoryReencoder {
    submissions: Mutex<Vec<Value>>,
    response: Mutex<Option<Result<ExportArtifact, (u16, Option<Value>)>>>,
}

impl InMemoryReencoder {
    /// Succeeds with the given artifact bytes.
    pub fn succeeding(bytes: Vec<u8>) -> Self {
        let fake = Self::default();
        *lock(&fake.response) = Some(Ok(ExportArtifact {
            bytes,
            content_type: "application/pdf".to_string(),
            suggested_name: DEFAULT_ARTIFACT_NAME.to_string(),
        }));
        fake
    }

    /// Fails every submission with the given status.
    pub fn failing(status: u16, detail: Option<Value>) -> Self {
        let fake = Self::default();
        *lock(&fake.response) = Some(Err((status, detail)));
        fake
    }

    /// The snapshots submitted so far, in order.
    pub fn submissions(&self) -> Vec<Value> {
        lock(&self.submissions).clone()
    }
}

// A panicking assertion in one test must not poison the fake for others.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Reencoder for InMemoryReencoder {
    async fn reencode(&self, snapshot: Value) -> Result<ExportArtifact, ExportError> {
        lock(&self.submissions).push(snapshot);
        match lock(&self.response).clone() {
            Some(Ok(artifact)) => Ok(artifact),
            Some(Err((status, detail))) => Err(ExportError::Service { status, detail }),
            None => Ok(ExportArtifact {
                bytes: Vec::new(),
                content_type: DEFAULT_CONTENT_TYPE.to_string(),
                suggested_name: DEFAULT_ARTIFACT_NAME.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
