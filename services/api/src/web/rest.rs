//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::chat_task::{run_ask, AskError};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use docchat_core::ingest::IngestError;
use docchat_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        upload_handler,
        get_document_handler,
        chat_handler,
        raw_document_handler,
        health_handler,
    ),
    components(
        schemas(UploadResponse, DocumentResponse, ChatRequest, ChatResponse, CitationPayload, HealthResponse)
    ),
    tags(
        (name = "Document Chat API", description = "API endpoints for uploading PDFs and chatting with them.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after a successful upload.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    success: bool,
    document_id: Uuid,
    filename: String,
    page_count: u32,
    message: String,
}

/// Document metadata returned by the lookup endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    id: Uuid,
    filename: String,
    page_count: u32,
    upload_date: DateTime<Utc>,
}

/// The body of a chat request.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    message: String,
}

/// One clickable citation attached to an answer.
#[derive(Serialize, ToSchema)]
pub struct CitationPayload {
    page: u32,
    text: Option<String>,
}

/// The assistant's reply to a chat request.
#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    response: String,
    citations: Vec<CitationPayload>,
    timestamp: DateTime<Utc>,
}

/// Liveness probe payload.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// All failures leave the service as a JSON `{ "error": ... }` body, the
/// shape the frontend renders directly.
type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: String) -> ErrorResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Maps ingestion failures to HTTP statuses: validation failures are the
/// client's fault (4xx), parse and storage failures are ours (4xx/5xx).
fn ingest_error_response(err: IngestError) -> ErrorResponse {
    let status = match &err {
        IngestError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        IngestError::ParseFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IngestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

fn port_error_response(err: PortError) -> ErrorResponse {
    match err {
        PortError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, format!("{} not found", what))
        }
        PortError::Unexpected(msg) => {
            error!("Port operation failed: {}", msg);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Upload a PDF and make it available for chat.
///
/// Accepts a multipart/form-data request with a single `pdf` file part.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "The PDF to upload."),
    responses(
        (status = 201, description = "Document ingested successfully", body = UploadResponse),
        (status = 400, description = "Multipart form did not include a pdf part"),
        (status = 413, description = "File exceeds the upload size limit"),
        (status = 415, description = "Declared content type is not application/pdf"),
        (status = 422, description = "File could not be parsed as a PDF"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ErrorResponse> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        if field.name() != Some("pdf") {
            continue;
        }
        let declared_mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        let data = field.bytes().await.map_err(|e| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        upload = Some((declared_mime, filename, data));
        break;
    }

    let (declared_mime, filename, data) = upload.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Multipart form must include a 'pdf' file part".to_string(),
        )
    })?;

    let document = app_state
        .pipeline
        .ingest(data, &declared_mime, &filename)
        .await
        .map_err(ingest_error_response)?;

    let response = UploadResponse {
        success: true,
        document_id: document.id,
        filename: document.filename,
        page_count: document.page_count,
        message: "PDF uploaded and processed successfully".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Look up metadata for an ingested document.
#[utoipa::path(
    get,
    path = "/api/document/{id}",
    responses(
        (status = 200, description = "Document metadata", body = DocumentResponse),
        (status = 404, description = "No document with this id")
    ),
    params(
        ("id" = Uuid, Path, description = "The document identifier returned at upload.")
    )
)]
pub async fn get_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let document = app_state
        .store
        .get(id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(DocumentResponse {
        id: document.id,
        filename: document.filename,
        page_count: document.page_count,
        upload_date: document.uploaded_at,
    }))
}

/// Ask a question about a document.
///
/// Appends the question and the assistant's reply to the document's chat
/// session. Engine failures surface in-band as an error-flagged reply; a
/// question arriving while another is still being answered is rejected
/// with 409.
#[utoipa::path(
    post,
    path = "/api/chat/{document_id}",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's reply", body = ChatResponse),
        (status = 404, description = "No document with this id"),
        (status = 409, description = "A question is already in flight for this document"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("document_id" = Uuid, Path, description = "The document to ask about.")
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let document = app_state
        .store
        .get(document_id)
        .await
        .map_err(port_error_response)?;

    let session = app_state.session_for(document_id).await;
    let reply = run_ask(
        app_state.engine.clone(),
        session,
        &document,
        &request.message,
        CancellationToken::new(),
    )
    .await
    .map_err(|e| match e {
        AskError::Busy => error_response(StatusCode::CONFLICT, e.to_string()),
        AskError::Cancelled => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    Ok(Json(ChatResponse {
        response: reply.text,
        citations: reply
            .citations
            .into_iter()
            .map(|c| CitationPayload {
                page: c.page,
                text: c.snippet,
            })
            .collect(),
        timestamp: reply.created_at,
    }))
}

/// Stream back the originally uploaded bytes for rendering.
#[utoipa::path(
    get,
    path = "/api/uploads/{id}",
    responses(
        (status = 200, description = "The raw PDF bytes", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "No stored file for this id")
    ),
    params(
        ("id" = Uuid, Path, description = "The document identifier returned at upload.")
    )
)]
pub async fn raw_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let raw = app_state.blobs.get(id).await.map_err(port_error_response)?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], raw))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}
