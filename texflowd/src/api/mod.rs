//! HTTP API routes for the TexFlow compile service.
//!
//! Thin glue: request validation, engine dispatch, and outcome → status
//! mapping. Everything interesting happens in [`crate::compile`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use shared_types::{CompileRequest, ErrorResponse, HealthResponse};

use crate::compile::CompileOutcome;
use crate::state::AppState;

/// Configure all API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compile", post(compile))
        .route("/health", get(health_check))
}

/// POST /compile — run the full compilation pipeline
pub async fn compile(
    State(state): State<AppState>,
    body: Result<Json<CompileRequest>, JsonRejection>,
) -> Response {
    // Reject before any workspace exists. An unparseable body and a missing
    // `latex` field share the same contract.
    let Ok(Json(req)) = body else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("No latex code provided"),
        );
    };
    if req.latex.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("No latex code provided"),
        );
    }

    match state.engine.compile(&req).await {
        CompileOutcome::Success(pdf) => {
            ([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response()
        }
        CompileOutcome::ToolchainFailure { log } => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::with_logs("Compilation failed", log),
        ),
        CompileOutcome::MissingArtifact { log } => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_logs("PDF not generated", log),
        ),
        // 508: distinct from a compile failure so callers can tell "your
        // document has an error" from "this took too long".
        CompileOutcome::Timeout => error_response(
            StatusCode::LOOP_DETECTED,
            ErrorResponse::new("Compilation timed out"),
        ),
        CompileOutcome::Internal { message } => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::ok()))
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}
