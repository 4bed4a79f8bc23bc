//! Commit/export pipeline.
//!
//! Serializes an edited document snapshot, submits it to the external
//! re-encoding collaborator, and hands back the binary artifact for
//! download. Transport and service failures are recoverable: the caller
//! keeps its snapshot and pending edits and may retry.

mod error;
mod reencoder;
mod serialize;

pub use error::ExportError;
pub use reencoder::{ExportArtifact, HttpReencoder, InMemoryReencoder, Reencoder};
pub use serialize::{MAX_EXPORT_DEPTH, REDACTION_SENTINEL, snapshot_value};
