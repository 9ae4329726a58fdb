//! In-memory note store for tests and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use notevault_core::{
    now, NewNote, Note, NoteId, NoteUpdate, Page, StorageError, StorageResult,
};
use tokio::sync::RwLock;

use crate::NoteStore;

#[derive(Debug, Default)]
struct Inner {
    notes: BTreeMap<NoteId, Note>,
    last_id: NoteId,
}

/// Note store backed by a `BTreeMap`.
///
/// Ids come from a monotonically increasing counter, so deleted ids are
/// never handed out again, matching a `BIGSERIAL` column.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    inner: RwLock<Inner>,
}

impl InMemoryNoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create(&self, note: &NewNote) -> StorageResult<NoteId> {
        let mut inner = self.inner.write().await;
        let id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::backend("insert note", "id sequence exhausted"))?;
        inner.last_id = id;
        inner.notes.insert(
            id,
            Note {
                id,
                title: note.title.clone(),
                content: note.content.clone(),
                author: note.author.clone(),
                is_public: note.is_public,
                created_at: now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: NoteId) -> StorageResult<Note> {
        let inner = self.inner.read().await;
        inner
            .notes
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound { id })
    }

    async fn list(&self, page: Page) -> StorageResult<Vec<Note>> {
        let inner = self.inner.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(inner
            .notes
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(&self, id: NoteId, update: &NoteUpdate) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        let note = inner
            .notes
            .get_mut(&id)
            .ok_or(StorageError::NotFound { id })?;
        update.apply_to(note, now());
        Ok(())
    }

    async fn delete(&self, id: NoteId) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound { id })
    }
}
