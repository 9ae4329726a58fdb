//! NoteVault Test Utilities
//!
//! Centralized test infrastructure for the NoteVault workspace:
//! - Proptest generators for notes and partial updates
//! - Fixtures for common scenarios
//! - Assertions for note invariants

// Re-export the in-memory store from its source crate
pub use notevault_storage::InMemoryNoteStore;

pub use notevault_core::{NewNote, Note, NoteId, NoteUpdate, Page, StorageError, StorageResult};

use notevault_storage::NoteStore;
use proptest::prelude::*;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Strategy for generating note titles.
pub fn arb_title() -> impl Strategy<Value = String> {
    prop_oneof![
        // Simple titles
        "Note [0-9]{1,5}",
        // Descriptive titles
        "[A-Z][a-z]{3,15} [a-z]{3,10}",
        // Edge case: single character
        Just("N".to_string()),
        // Edge case: unicode
        Just("Заметка ✓".to_string()),
        // Edge case: long title
        "[a-z ]{50,100}",
    ]
}

/// Strategy for generating note content.
pub fn arb_content() -> impl Strategy<Value = String> {
    prop_oneof![
        // Short content
        "[A-Z][a-z ]{10,50}\\.",
        // Multi-sentence content
        "([A-Z][a-z ]{10,30}\\. ){2,4}",
        // Code-like content
        "fn [a-z_]+\\(\\) \\{ [a-z_]+ \\}",
        // Multi-line content
        Just("line one\nline two\n\ttabbed".to_string()),
    ]
}

/// Strategy for generating authors, including the empty string.
pub fn arb_author() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}",
        1 => Just(String::new()),
    ]
}

/// Strategy for generating a complete `NewNote` with an author set.
pub fn arb_new_note() -> impl Strategy<Value = NewNote> {
    (arb_title(), arb_content(), arb_author(), any::<bool>()).prop_map(
        |(title, content, author, is_public)| NewNote {
            title,
            content,
            author: Some(author),
            is_public,
        },
    )
}

/// Strategy for generating partial updates.
///
/// Each field is independently absent, an explicit empty value, or a
/// generated value.
pub fn arb_note_update() -> impl Strategy<Value = NoteUpdate> {
    fn optional_text(inner: BoxedStrategy<String>) -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            2 => Just(None),
            1 => Just(Some(String::new())),
            2 => inner.prop_map(Some),
        ]
    }

    (
        optional_text(arb_title().boxed()),
        optional_text(arb_content().boxed()),
        optional_text(arb_author().boxed()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(title, content, author, is_public)| NoteUpdate {
            title,
            content,
            author,
            is_public,
        })
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A public note with the given title and a derived body.
pub fn sample_new_note(title: &str) -> NewNote {
    NewNote::new(title, format!("Body of {}", title))
        .with_author("Test Author")
        .public(true)
}

/// Create one note per title and return their ids in creation order.
pub async fn seed_notes(store: &dyn NoteStore, titles: &[&str]) -> StorageResult<Vec<NoteId>> {
    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        ids.push(store.create(&sample_new_note(title)).await?);
    }
    Ok(ids)
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Check that `note` carries exactly the fields of `expected` and has never
/// been updated.
pub fn assert_matches_new(note: &Note, expected: &NewNote) -> Result<(), String> {
    if note.title != expected.title {
        return Err(format!("title {:?} != {:?}", note.title, expected.title));
    }
    if note.content != expected.content {
        return Err(format!("content {:?} != {:?}", note.content, expected.content));
    }
    if note.author != expected.author {
        return Err(format!("author {:?} != {:?}", note.author, expected.author));
    }
    if note.is_public != expected.is_public {
        return Err(format!("is_public {} != {}", note.is_public, expected.is_public));
    }
    if note.updated_at.is_some() {
        return Err("updated_at set on a fresh note".to_string());
    }
    Ok(())
}

/// Compute what `before` should look like after `update`, ignoring
/// `updated_at`.
pub fn expected_after_update(before: &Note, update: &NoteUpdate) -> Note {
    let mut expected = before.clone();
    update.apply_to(&mut expected, before.created_at);
    expected.updated_at = None;
    expected
}

/// Check that ids are strictly ascending.
pub fn assert_ascending_ids(notes: &[Note]) -> Result<(), String> {
    match notes.windows(2).find(|w| w[0].id >= w[1].id) {
        Some(w) => Err(format!("ids out of order: {} then {}", w[0].id, w[1].id)),
        None => Ok(()),
    }
}
