//! Demo client that walks a running NoteVault server through every RPC.
//!
//! Set `NOTEVAULT_SERVER_ADDR` to point at a server other than
//! `http://localhost:5001`.

use std::time::Duration;

use notevault_api::config::env_var;
use notevault_api::proto::note_v1_client::NoteV1Client;
use notevault_api::proto::{
    CreateRequest, DeleteRequest, GetRequest, ListRequest, Note, UpdateRequest,
};
use notevault_api::{init_tracing, ApiError, ApiResult, TelemetryConfig};
use tonic::{Code, Request};

const DEFAULT_SERVER_ADDR: &str = "http://localhost:5001";
const CALL_DEADLINE: Duration = Duration::from_secs(5);

fn with_deadline<T>(message: T) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(CALL_DEADLINE);
    request
}

fn rpc_error(call: &str, status: tonic::Status) -> ApiError {
    ApiError::internal_error(format!("{} failed: {}", call, status))
}

fn describe(note: &Note) -> String {
    format!(
        "id={} title={:?} content={:?} author={:?} public={} updated={}",
        note.id,
        note.title,
        note.content,
        note.author,
        note.is_public,
        note.updated_at.is_some()
    )
}

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::from_env())?;

    let addr = env_var("NOTEVAULT_SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
    let mut client = NoteV1Client::connect(addr.clone()).await?;
    tracing::info!(%addr, "Connected");

    tracing::info!("=== Creating notes ===");
    let mut ids = Vec::new();
    for i in 1..=3 {
        let response = client
            .create(with_deadline(CreateRequest {
                title: format!("Test Note {}", i),
                content: format!("This is test note number {}", i),
                author: "Test Author".to_string(),
                is_public: true,
            }))
            .await
            .map_err(|s| rpc_error("Create", s))?;
        let id = response.into_inner().id;
        tracing::info!(id, "Created note");
        ids.push(id);
    }

    tracing::info!("=== Listing notes ===");
    let notes = client
        .list(with_deadline(ListRequest { limit: 10, offset: 0 }))
        .await
        .map_err(|s| rpc_error("List", s))?
        .into_inner()
        .notes;
    for note in &notes {
        tracing::info!("{}", describe(note));
    }

    let Some(&first) = ids.first() else {
        return Ok(());
    };

    tracing::info!("=== Getting note {} ===", first);
    let note = client
        .get(with_deadline(GetRequest { id: first }))
        .await
        .map_err(|s| rpc_error("Get", s))?
        .into_inner()
        .note;
    if let Some(note) = &note {
        tracing::info!("{}", describe(note));
    }

    tracing::info!("=== Updating note {} ===", first);
    client
        .update(with_deadline(UpdateRequest {
            id: first,
            title: Some("Updated Title".to_string()),
            content: Some("Updated content".to_string()),
            author: None,
            is_public: None,
        }))
        .await
        .map_err(|s| rpc_error("Update", s))?;

    let updated = client
        .get(with_deadline(GetRequest { id: first }))
        .await
        .map_err(|s| rpc_error("Get", s))?
        .into_inner()
        .note;
    if let Some(note) = &updated {
        tracing::info!("{}", describe(note));
    }

    tracing::info!("=== Deleting note {} ===", first);
    client
        .delete(with_deadline(DeleteRequest { id: first }))
        .await
        .map_err(|s| rpc_error("Delete", s))?;

    match client.get(with_deadline(GetRequest { id: first })).await {
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!(id = first, "Note is gone after delete");
        }
        Err(status) => return Err(rpc_error("Get", status)),
        Ok(_) => {
            return Err(ApiError::internal_error(format!(
                "Note {} still present after delete",
                first
            )));
        }
    }

    Ok(())
}
