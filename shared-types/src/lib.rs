//! Shared types between the TexFlow server and client tooling
//!
//! These types define the JSON surface of the compile service:
//! - `CompileRequest` / `ImageAsset` — inbound request body
//! - `ErrorResponse` — failure bodies (400/500/508)
//! - `HealthResponse` — liveness probe body
//!
//! Serializable with serde for JSON over HTTP.

use serde::{Deserialize, Serialize};

// ============================================================================
// Compile API
// ============================================================================

/// Request body for `POST /compile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
    /// The LaTeX source, written verbatim to the workspace entry point.
    pub latex: String,

    /// Embedded image assets referenced by the source.
    #[serde(default)]
    pub images: Vec<ImageAsset>,

    /// Requested compile budget in seconds. Omitted means the server
    /// default; the server clamps whatever is requested to its ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// A single image asset attached to a compile request.
///
/// `url` is expected to be a self-describing data URI
/// (`data:<mime>;base64,<payload>`). Other URL schemes are accepted but
/// not fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Filename the asset is written under inside the workspace.
    pub name: String,

    /// Data URI (or external reference, which is ignored).
    pub url: String,
}

/// JSON body returned for every non-200 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error summary.
    pub error: String,

    /// Captured toolchain log, present for compile failures so the caller
    /// can diagnose document-source problems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            logs: None,
        }
    }

    pub fn with_logs(error: impl Into<String>, logs: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            logs: Some(logs.into()),
        }
    }
}

// ============================================================================
// Health API
// ============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
