//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    AnalysisResponse, AnalyzeEntryRequest, CreateEntryRequest, DateGroupResponse,
    InsightsQuery, InsightsResponse, JournalEntryResponse, ListEntriesQuery, MessageResponse,
    MoodShareResponse, RecordEntryRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{FixedOffset, Local, Utc};
use journal_core::ports::PortError;
use journal_core::service::EntryMetadata;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze_entry_handler,
        create_entry_handler,
        record_entry_handler,
        list_entries_handler,
        get_entry_handler,
        delete_entry_handler,
        insights_handler,
    ),
    components(
        schemas(
            AnalyzeEntryRequest,
            AnalysisResponse,
            CreateEntryRequest,
            RecordEntryRequest,
            JournalEntryResponse,
            InsightsResponse,
            MoodShareResponse,
            DateGroupResponse,
            MessageResponse,
        )
    ),
    tags(
        (name = "Voice Journal API", description = "Journal entry analysis, storage and insights.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

type ErrorResponse = (StatusCode, Json<MessageResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(MessageResponse::new(message)))
}

fn entry_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ErrorResponse> {
    path.map(|Path(id)| id).map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid journal entry id: {}", rejection.body_text()),
        )
    })
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ErrorResponse> {
    query.map(|Query(params)| params).map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid query parameters: {}", rejection.body_text()),
        )
    })
}

/// Maps a port error onto the HTTP boundary. `context` is the message used for
/// anything that is not the caller's fault.
fn port_error_response(e: PortError, context: &str) -> ErrorResponse {
    match e {
        PortError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Journal entry not found"),
        PortError::InvalidEntry(reason) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid journal entry data: {}", reason),
        ),
        other => {
            error!("{}: {:?}", context, other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Analyze a transcript.
///
/// Always answers 200 for a non-empty transcript; when the language model is
/// unavailable or its output cannot be trusted, a fixed fallback analysis is returned.
#[utoipa::path(
    post,
    path = "/api/analyze-entry",
    request_body = AnalyzeEntryRequest,
    responses(
        (status = 200, description = "Analysis (possibly the fallback)", body = AnalysisResponse),
        (status = 400, description = "Transcript missing or empty", body = MessageResponse)
    )
)]
pub async fn analyze_entry_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let transcript = payload
        .ok()
        .and_then(|Json(req)| req.transcript)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Transcript is required"))?;

    let analysis = app_state.entries.analyze(&transcript).await;
    Ok(Json(AnalysisResponse::from(analysis)))
}

/// Store a journal entry.
#[utoipa::path(
    post,
    path = "/api/journal-entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = JournalEntryResponse),
        (status = 400, description = "Invalid journal entry data", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn create_entry_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected journal entry body: {}", rejection.body_text());
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid journal entry data: {}", rejection.body_text()),
        )
    })?;

    let entry = app_state
        .entries
        .create_entry(req.into())
        .await
        .map_err(|e| port_error_response(e, "Failed to create journal entry"))?;

    Ok((StatusCode::CREATED, Json(JournalEntryResponse::from(entry))))
}

/// Analyze a transcript and store the resulting entry in one step.
#[utoipa::path(
    post,
    path = "/api/record-entry",
    request_body = RecordEntryRequest,
    responses(
        (status = 201, description = "Entry analyzed and created", body = JournalEntryResponse),
        (status = 400, description = "Transcript missing or entry invalid", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn record_entry_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<RecordEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(req) = payload.map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    })?;

    let transcript = req
        .transcript
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Transcript is required"))?;

    let metadata = EntryMetadata {
        user_id: req.user_id,
        audio_url: req.audio_url,
        duration: req.duration,
    };
    let entry = app_state
        .entries
        .record_entry(&transcript, metadata)
        .await
        .map_err(|e| port_error_response(e, "Failed to record journal entry"))?;

    Ok((StatusCode::CREATED, Json(JournalEntryResponse::from(entry))))
}

/// List journal entries, newest first.
#[utoipa::path(
    get,
    path = "/api/journal-entries",
    params(ListEntriesQuery),
    responses(
        (status = 200, description = "Entries ordered by creation time, newest first", body = [JournalEntryResponse]),
        (status = 400, description = "Invalid query parameters", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn list_entries_handler(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<ListEntriesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let query = query_params(query)?;
    let entries = app_state
        .entries
        .list_entries(query.user_id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch journal entries"))?;

    let body: Vec<JournalEntryResponse> = entries.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Fetch a single journal entry.
#[utoipa::path(
    get,
    path = "/api/journal-entries/{id}",
    params(("id" = i32, Path, description = "Journal entry id")),
    responses(
        (status = 200, description = "The entry", body = JournalEntryResponse),
        (status = 400, description = "Invalid journal entry id", body = MessageResponse),
        (status = 404, description = "Journal entry not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn get_entry_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let id = entry_id(path)?;
    let entry = app_state
        .entries
        .get_entry(id)
        .await
        .map_err(|e| port_error_response(e, "Failed to fetch journal entry"))?;

    Ok(Json(JournalEntryResponse::from(entry)))
}

/// Delete a journal entry.
#[utoipa::path(
    delete,
    path = "/api/journal-entries/{id}",
    params(("id" = i32, Path, description = "Journal entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 400, description = "Invalid journal entry id", body = MessageResponse),
        (status = 404, description = "Journal entry not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn delete_entry_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let id = entry_id(path)?;
    app_state
        .entries
        .delete_entry(id)
        .await
        .map_err(|e| port_error_response(e, "Failed to delete journal entry"))?;

    Ok(Json(MessageResponse::new("Journal entry deleted successfully")))
}

/// Mood distribution and entry counts per day.
#[utoipa::path(
    get,
    path = "/api/insights",
    params(InsightsQuery),
    responses(
        (status = 200, description = "Aggregated insights", body = InsightsResponse),
        (status = 400, description = "Invalid query parameters or UTC offset", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn insights_handler(
    State(app_state): State<Arc<AppState>>,
    query: Result<Query<InsightsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let query = query_params(query)?;
    let insights = match query.utc_offset_minutes {
        Some(minutes) => {
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    error_response(StatusCode::BAD_REQUEST, "utcOffsetMinutes is out of range")
                })?;
            let now = Utc::now().with_timezone(&offset);
            app_state.entries.insights(query.user_id, &now).await
        }
        None => app_state.entries.insights(query.user_id, &Local::now()).await,
    }
    .map_err(|e| port_error_response(e, "Failed to compute insights"))?;

    Ok(Json(InsightsResponse::from(insights)))
}
