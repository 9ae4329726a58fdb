//! Service-Level Tests for the NoteV1 gRPC Handlers
//!
//! Drives `NoteServiceImpl` through the generated `NoteV1` trait over the
//! in-memory store, so status mapping and wire conversion are exercised
//! without a network listener or a database.

use std::sync::Arc;

use notevault_api::proto::note_v1_server::NoteV1;
use notevault_api::proto::{
    CreateRequest, DeleteRequest, GetRequest, ListRequest, Note, UpdateRequest,
};
use notevault_api::NoteServiceImpl;
use notevault_core::{MAX_PAGE_LIMIT, StorageError, StorageResult};
use notevault_storage::NoteStore;
use notevault_test_utils::*;
use proptest::prelude::*;
use tokio::runtime::Runtime;
use tonic::{Code, Request, Status};

// ============================================================================
// HELPERS
// ============================================================================

fn service() -> NoteServiceImpl {
    NoteServiceImpl::new(Arc::new(InMemoryNoteStore::new()))
}

/// A store whose every call fails at the backend.
struct FailingStore;

#[async_trait::async_trait]
impl NoteStore for FailingStore {
    async fn create(&self, _note: &NewNote) -> StorageResult<NoteId> {
        Err(StorageError::backend("insert note", "relation \"note\" does not exist"))
    }

    async fn get(&self, _id: NoteId) -> StorageResult<notevault_core::Note> {
        Err(StorageError::PoolUnavailable {
            reason: "timed out waiting for connection".to_string(),
        })
    }

    async fn list(&self, _page: Page) -> StorageResult<Vec<notevault_core::Note>> {
        Err(StorageError::backend("list notes", "connection reset"))
    }

    async fn update(&self, _id: NoteId, _update: &NoteUpdate) -> StorageResult<()> {
        Err(StorageError::backend("update note", "connection reset"))
    }

    async fn delete(&self, _id: NoteId) -> StorageResult<()> {
        Err(StorageError::backend("delete note", "connection reset"))
    }
}

fn create_request(title: &str, content: &str, author: &str, is_public: bool) -> CreateRequest {
    CreateRequest {
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        is_public,
    }
}

fn empty_update(id: NoteId) -> UpdateRequest {
    UpdateRequest {
        id,
        title: None,
        content: None,
        author: None,
        is_public: None,
    }
}

async fn create(svc: &NoteServiceImpl, req: CreateRequest) -> Result<NoteId, Status> {
    Ok(svc.create(Request::new(req)).await?.into_inner().id)
}

async fn get(svc: &NoteServiceImpl, id: NoteId) -> Result<Note, Status> {
    svc.get(Request::new(GetRequest { id }))
        .await?
        .into_inner()
        .note
        .ok_or_else(|| Status::internal("GetResponse without a note"))
}

async fn list(svc: &NoteServiceImpl, limit: i64, offset: i64) -> Result<Vec<Note>, Status> {
    Ok(svc
        .list(Request::new(ListRequest { limit, offset }))
        .await?
        .into_inner()
        .notes)
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_create_three_then_list() -> Result<(), Status> {
    let svc = service();
    let a = create(&svc, create_request("A", "a", "Ann", true)).await?;
    let b = create(&svc, create_request("B", "b", "Ben", false)).await?;
    let c = create(&svc, create_request("C", "c", "", true)).await?;
    assert!(a < b && b < c);

    let notes = list(&svc, 10, 0).await?;
    let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);

    let page = list(&svc, 1, 1).await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, b);
    Ok(())
}

#[tokio::test]
async fn test_get_returns_created_fields() -> Result<(), Status> {
    let svc = service();
    let id = create(&svc, create_request("Title", "Body", "Ann", true)).await?;

    let note = get(&svc, id).await?;
    assert_eq!(note.id, id);
    assert_eq!(note.title, "Title");
    assert_eq!(note.content, "Body");
    assert_eq!(note.author, "Ann");
    assert!(note.is_public);
    assert!(note.created_at.is_some());
    assert!(note.updated_at.is_none());
    Ok(())
}

#[tokio::test]
async fn test_partial_update_keeps_absent_fields() -> Result<(), Status> {
    let svc = service();
    let id = create(&svc, create_request("Old", "Body", "Ann", false)).await?;

    svc.update(Request::new(UpdateRequest {
        title: Some("New".to_string()),
        ..empty_update(id)
    }))
    .await?;

    let note = get(&svc, id).await?;
    assert_eq!(note.title, "New");
    assert_eq!(note.content, "Body");
    assert_eq!(note.author, "Ann");
    assert!(!note.is_public);
    assert!(note.updated_at.is_some());
    Ok(())
}

#[tokio::test]
async fn test_update_to_empty_string_is_applied() -> Result<(), Status> {
    let svc = service();
    let id = create(&svc, create_request("Title", "Body", "Ann", true)).await?;

    svc.update(Request::new(UpdateRequest {
        author: Some(String::new()),
        is_public: Some(false),
        ..empty_update(id)
    }))
    .await?;

    let note = get(&svc, id).await?;
    assert_eq!(note.author, "");
    assert!(!note.is_public);
    assert_eq!(note.title, "Title");
    Ok(())
}

#[tokio::test]
async fn test_empty_update_still_stamps() -> Result<(), Status> {
    let svc = service();
    let id = create(&svc, create_request("Title", "Body", "Ann", true)).await?;

    svc.update(Request::new(empty_update(id))).await?;

    let note = get(&svc, id).await?;
    assert_eq!(note.title, "Title");
    let (Some(created), Some(updated)) = (note.created_at, note.updated_at) else {
        panic!("both timestamps should be set");
    };
    assert!((updated.seconds, updated.nanos) >= (created.seconds, created.nanos));
    Ok(())
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() -> Result<(), Status> {
    let svc = service();
    let id = create(&svc, create_request("Doomed", "x", "Ann", false)).await?;

    svc.delete(Request::new(DeleteRequest { id })).await?;

    let err = get(&svc, id).await.err().map(|s| s.code());
    assert_eq!(err, Some(Code::NotFound));

    let again = svc.delete(Request::new(DeleteRequest { id })).await;
    assert_eq!(again.err().map(|s| s.code()), Some(Code::NotFound));
    Ok(())
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let svc = service();

    let got = svc.get(Request::new(GetRequest { id: 999 })).await;
    assert_eq!(got.err().map(|s| s.code()), Some(Code::NotFound));

    let updated = svc.update(Request::new(empty_update(999))).await;
    assert_eq!(updated.err().map(|s| s.code()), Some(Code::NotFound));

    let deleted = svc.delete(Request::new(DeleteRequest { id: 999 })).await;
    assert_eq!(deleted.err().map(|s| s.code()), Some(Code::NotFound));
}

#[tokio::test]
async fn test_list_empty_store() -> Result<(), Status> {
    let svc = service();
    assert!(list(&svc, 10, 0).await?.is_empty());
    assert!(list(&svc, 0, 0).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_zero_limit_returns_nothing() -> Result<(), Status> {
    let svc = service();
    for title in ["A", "B", "C"] {
        create(&svc, create_request(title, "x", "Ann", true)).await?;
    }
    assert!(list(&svc, 0, 0).await?.is_empty());
    assert_eq!(list(&svc, 2, 0).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_list_offset_past_end_is_empty() -> Result<(), Status> {
    let svc = service();
    for title in ["A", "B"] {
        create(&svc, create_request(title, "x", "Ann", true)).await?;
    }
    assert!(list(&svc, 10, 5).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_negative_paging_is_invalid_argument() {
    let svc = service();

    let negative_limit = list(&svc, -1, 0).await;
    assert_eq!(
        negative_limit.err().map(|s| s.code()),
        Some(Code::InvalidArgument)
    );

    let negative_offset = list(&svc, 10, -5).await;
    assert_eq!(
        negative_offset.err().map(|s| s.code()),
        Some(Code::InvalidArgument)
    );
}

#[tokio::test]
async fn test_backend_failures_are_internal_with_cause() {
    let svc = NoteServiceImpl::new(Arc::new(FailingStore));

    let created = svc
        .create(Request::new(create_request("A", "a", "Ann", true)))
        .await;
    let Err(status) = created else {
        panic!("create should fail");
    };
    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("insert note"));
    assert!(status.message().contains("relation \"note\" does not exist"));

    let got = svc.get(Request::new(GetRequest { id: 1 })).await;
    let Err(status) = got else {
        panic!("get should fail");
    };
    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("timed out waiting for connection"));

    let listed = list(&svc, 10, 0).await;
    assert_eq!(listed.err().map(|s| s.code()), Some(Code::Internal));
}

#[tokio::test]
async fn test_update_and_delete_failures_are_internal_not_not_found() {
    let svc = NoteServiceImpl::new(Arc::new(FailingStore));

    let updated = svc
        .update(Request::new(UpdateRequest {
            title: Some("New".to_string()),
            ..empty_update(1)
        }))
        .await;
    let Err(status) = updated else {
        panic!("update should fail");
    };
    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("update note"));

    let deleted = svc.delete(Request::new(DeleteRequest { id: 1 })).await;
    let Err(status) = deleted else {
        panic!("delete should fail");
    };
    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().contains("delete note"));
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn fail(status: Status) -> TestCaseError {
    TestCaseError::fail(format!("RPC failed: {}", status))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever is created comes back unchanged from Get.
    #[test]
    fn prop_create_then_get_round_trips(
        title in arb_title(),
        content in arb_content(),
        author in arb_author(),
        is_public in any::<bool>(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let svc = service();
            let id = create(&svc, CreateRequest {
                title: title.clone(),
                content: content.clone(),
                author: author.clone(),
                is_public,
            })
            .await
            .map_err(fail)?;

            let note = get(&svc, id).await.map_err(fail)?;
            prop_assert_eq!(note.title, title);
            prop_assert_eq!(note.content, content);
            prop_assert_eq!(note.author, author);
            prop_assert_eq!(note.is_public, is_public);
            prop_assert!(note.updated_at.is_none());
            Ok(())
        })?;
    }

    /// Only the fields present in an update change.
    #[test]
    fn prop_update_changes_only_present_fields(
        new_note in arb_new_note(),
        update in arb_note_update(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = Arc::new(InMemoryNoteStore::new());
            let svc = NoteServiceImpl::new(store.clone());

            let id = store
                .create(&new_note)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let before = store
                .get(id)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            svc.update(Request::new(UpdateRequest {
                id,
                title: update.title.clone(),
                content: update.content.clone(),
                author: update.author.clone(),
                is_public: update.is_public,
            }))
            .await
            .map_err(fail)?;

            let mut after = store
                .get(id)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(after.updated_at.is_some_and(|at| at >= after.created_at));
            after.updated_at = None;
            prop_assert_eq!(after, expected_after_update(&before, &update));
            Ok(())
        })?;
    }

    /// List never returns more than the effective limit, in id order.
    #[test]
    fn prop_list_respects_limit(
        count in 0usize..12,
        limit in 0i64..20,
        offset in 0i64..15,
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let svc = service();
            for i in 0..count {
                create(&svc, create_request(&format!("Note {}", i), "x", "Ann", false))
                    .await
                    .map_err(fail)?;
            }

            let notes = list(&svc, limit, offset).await.map_err(fail)?;
            let expected = count.saturating_sub(offset as usize).min(limit as usize);
            prop_assert_eq!(notes.len(), expected);
            prop_assert!(notes.len() as i64 <= MAX_PAGE_LIMIT);
            prop_assert!(notes.windows(2).all(|w| w[0].id < w[1].id));
            Ok(())
        })?;
    }
}
