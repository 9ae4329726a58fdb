//! NoteVault Core - Entity Types
//!
//! Pure data structures shared by every other crate in the workspace.
//! Storage access lives in `notevault-storage`; the wire layer lives in
//! `notevault-api`.

mod entities;
mod error;
mod identity;
mod page;

pub use entities::{NewNote, Note, NoteUpdate};
pub use error::{StorageError, StorageResult};
pub use identity::{now, NoteId, Timestamp};
pub use page::{Page, MAX_PAGE_LIMIT};
