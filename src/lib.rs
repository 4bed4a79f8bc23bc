//! Folio reconstructs a visual, editable representation of a parsed
//! document and reconciles in-place text edits back into the structured
//! model.
//!
//! The rendering loop runs Document -> Compositor -> RenderTree; the
//! edit loop runs edit signal -> reconciliation -> new Document. Both
//! share the document snapshot as the single source of truth, and the
//! snapshot is never mutated in place: a successful commit swaps in a
//! replacement wholesale.

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{EditPhase, Session};

pub use folio_compose::{ComposeMode, Compositor, RenderNode, RenderTree, render_html};
pub use folio_edit::{EditQueue, EditRecord, commit};
pub use folio_export::{ExportArtifact, ExportError, HttpReencoder, InMemoryReencoder, Reencoder};
pub use folio_model::{Document, Page, Run, RunAddress, TextItem};
pub use folio_style::{ResolvedTextStyle, resolve_color, resolve_style};
pub use folio_view::{ViewController, ViewState};
