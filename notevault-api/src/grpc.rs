//! gRPC Service Implementation
//!
//! This module implements the `note_v1.NoteV1` service defined in
//! proto/note_v1.proto. Handlers translate proto messages into core types,
//! delegate to a [`NoteStore`], and classify failures into gRPC status
//! codes through [`ApiError`].

use std::sync::Arc;

use notevault_core::{NewNote, Note, NoteUpdate, Page, StorageError, Timestamp};
use notevault_storage::NoteStore;
use tonic::{Request, Response, Status};

use crate::error::ApiError;

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("note_v1");

    /// Encoded file descriptor set for gRPC server reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("note_v1_descriptor");
}

use proto::note_v1_server::{NoteV1, NoteV1Server};
use proto::{
    CreateRequest, CreateResponse, DeleteRequest, GetRequest, GetResponse, ListRequest,
    ListResponse, UpdateRequest,
};

// ============================================================================
// CONVERSION HELPERS
// ============================================================================

/// Convert a timestamp to its protobuf representation.
pub fn timestamp_to_proto(ts: &Timestamp) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: ts.timestamp(),
        nanos: ts.timestamp_subsec_nanos() as i32,
    }
}

/// Convert a note to its protobuf representation.
///
/// A missing author is sent as the empty string; a missing `updated_at`
/// leaves the field unset.
pub fn note_to_proto(n: &Note) -> proto::Note {
    proto::Note {
        id: n.id,
        title: n.title.clone(),
        content: n.content.clone(),
        author: n.author.clone().unwrap_or_default(),
        is_public: n.is_public,
        created_at: Some(timestamp_to_proto(&n.created_at)),
        updated_at: n.updated_at.as_ref().map(timestamp_to_proto),
    }
}

fn to_status(err: StorageError) -> Status {
    if err.is_not_found() {
        tracing::debug!(error = %err, "Note not found");
    }
    ApiError::from(err).into()
}

// ============================================================================
// NOTE SERVICE IMPLEMENTATION
// ============================================================================

/// `NoteV1` service over an injected storage handle.
pub struct NoteServiceImpl {
    store: Arc<dyn NoteStore>,
}

impl NoteServiceImpl {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl NoteV1 for NoteServiceImpl {
    #[tracing::instrument(skip_all, fields(title_len = request.get_ref().title.len()))]
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        let req = request.into_inner();
        let new_note = NewNote {
            title: req.title,
            content: req.content,
            author: Some(req.author),
            is_public: req.is_public,
        };

        let id = self.store.create(&new_note).await.map_err(to_status)?;
        tracing::debug!(id, "Note created");

        Ok(Response::new(CreateResponse { id }))
    }

    #[tracing::instrument(skip_all, fields(id = request.get_ref().id))]
    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let id = request.into_inner().id;
        let note = self.store.get(id).await.map_err(to_status)?;

        Ok(Response::new(GetResponse {
            note: Some(note_to_proto(&note)),
        }))
    }

    #[tracing::instrument(
        skip_all,
        fields(limit = request.get_ref().limit, offset = request.get_ref().offset)
    )]
    async fn list(&self, request: Request<ListRequest>) -> Result<Response<ListResponse>, Status> {
        let req = request.into_inner();
        let page = Page::new(req.limit, req.offset).map_err(to_status)?;

        let notes = self.store.list(page).await.map_err(to_status)?;
        tracing::debug!(count = notes.len(), "Notes listed");

        Ok(Response::new(ListResponse {
            notes: notes.iter().map(note_to_proto).collect(),
        }))
    }

    #[tracing::instrument(skip_all, fields(id = request.get_ref().id))]
    async fn update(&self, request: Request<UpdateRequest>) -> Result<Response<()>, Status> {
        let req = request.into_inner();
        let update = NoteUpdate {
            title: req.title,
            content: req.content,
            author: req.author,
            is_public: req.is_public,
        };

        if update.is_empty() {
            tracing::debug!("Update carries no fields; only updated_at changes");
        }

        self.store.update(req.id, &update).await.map_err(to_status)?;
        tracing::debug!("Note updated");

        Ok(Response::new(()))
    }

    #[tracing::instrument(skip_all, fields(id = request.get_ref().id))]
    async fn delete(&self, request: Request<DeleteRequest>) -> Result<Response<()>, Status> {
        let id = request.into_inner().id;

        self.store.delete(id).await.map_err(to_status)?;
        tracing::debug!("Note deleted");

        Ok(Response::new(()))
    }
}

// ============================================================================
// PUBLIC API - Service Constructors
// ============================================================================

/// Create the `NoteV1` server over the given storage handle.
pub fn create_service(store: Arc<dyn NoteStore>) -> NoteV1Server<NoteServiceImpl> {
    NoteV1Server::new(NoteServiceImpl::new(store))
}
