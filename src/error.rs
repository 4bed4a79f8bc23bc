//! Errors surfaced by the session layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid document payload: {0}")]
    Load(#[from] serde_json::Error),

    #[error("a commit is already in flight")]
    CommitInFlight,

    #[error(transparent)]
    Export(#[from] folio_export::ExportError),
}
