//! NoteVault Storage - Storage Trait and In-Memory Implementation
//!
//! Defines the storage seam the gRPC service is written against.
//! The PostgreSQL implementation lives in `notevault-api::db`.

mod memory;

pub use memory::InMemoryNoteStore;

use async_trait::async_trait;
use notevault_core::{NewNote, Note, NoteId, NoteUpdate, Page, StorageResult};

/// Async storage trait for note CRUD.
///
/// Each method maps onto exactly one statement against the backing store.
/// Implementations must report a missing id as
/// [`StorageError::NotFound`](notevault_core::StorageError::NotFound) and
/// every other failure as one of the remaining variants.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a note and return the id the store assigned to it.
    async fn create(&self, note: &NewNote) -> StorageResult<NoteId>;

    /// Fetch a single note by id.
    async fn get(&self, id: NoteId) -> StorageResult<Note>;

    /// List notes in ascending id order within the given window.
    async fn list(&self, page: Page) -> StorageResult<Vec<Note>>;

    /// Apply a partial update and refresh `updated_at`.
    async fn update(&self, id: NoteId, update: &NoteUpdate) -> StorageResult<()>;

    /// Permanently remove a note.
    async fn delete(&self, id: NoteId) -> StorageResult<()>;
}
