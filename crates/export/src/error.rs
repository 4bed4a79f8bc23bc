use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transport failure during export: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("re-encoding service returned status {status}")]
    Service {
        status: u16,
        /// The service's JSON error payload, when it sent one.
        detail: Option<serde_json::Value>,
    },
}

impl ExportError {
    /// Every export failure leaves the snapshot and pending edits
    /// untouched, so all variants are retryable from the user's side.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
