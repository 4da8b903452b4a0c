//! HTTP routes, shared state, and error-to-response mapping.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::error;

use studio_contact::{ContactService, DISPATCH_FAILURE_MESSAGE};
use studio_i18n::{Catalog, Language, language_cookie, language_from_cookie};
use studio_outline::OutlineGenerator;
use studio_shared::{
    AppConfig, Budget, FieldError, ProjectIdeaInput, ProjectOutline, StudioError,
    SubmissionResult, Timeline,
};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Per-process services shared by every request. Holds no mutable state.
#[derive(Clone)]
pub(crate) struct AppState {
    pub contact: Arc<ContactService>,
    pub outline: Arc<OutlineGenerator>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Wire every service from the loaded config.
    pub fn from_config(config: &AppConfig, api_key: &str) -> studio_shared::Result<Self> {
        Ok(Self {
            contact: Arc::new(studio_contact::service_from_config(&config.email, api_key)?),
            outline: Arc::new(OutlineGenerator::new(config.outline.latency())),
            catalog: Arc::new(Catalog::builtin()?),
        })
    }
}

/// Build the application router.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/contact",
            post(submit_contact).fallback(method_not_allowed),
        )
        .route("/api/contact/options", get(contact_options))
        .route(
            "/api/outline",
            post(generate_outline).fallback(method_not_allowed),
        )
        .route("/api/translations/:key", get(translate))
        .route("/api/language", put(set_language))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request failure as seen by the HTTP client.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// Contact form rejected field by field (400).
    InvalidForm {
        message: String,
        fields: Vec<FieldError>,
    },
    /// Single-message rejection (400).
    BadRequest(String),
    /// Primary email failed (500, generic message).
    Dispatch(String),
    /// Anything else (500, generic message).
    Internal(String),
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Validation { message, fields } if !fields.is_empty() => {
                Self::InvalidForm { message, fields }
            }
            StudioError::Validation { message, .. } => Self::BadRequest(message),
            StudioError::Dispatch(detail) => Self::Dispatch(detail),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidForm { message, fields } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message, "errors": fields })),
            )
                .into_response(),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            Self::Dispatch(detail) => {
                error!(detail = %detail, "contact dispatch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": DISPATCH_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
            Self::Internal(detail) => {
                error!(detail = %detail, "unexpected error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method not allowed" })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

async fn submit_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmissionResult>, ApiError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("unreadable contact body: {e}")))?;

    let result = state.contact.submit(&body).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
struct OptionEntry {
    value: &'static str,
    label: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct ContactOptions {
    budgets: Vec<OptionEntry>,
    timelines: Vec<OptionEntry>,
}

async fn contact_options() -> Json<ContactOptions> {
    Json(ContactOptions {
        budgets: Budget::ALL
            .iter()
            .map(|b| OptionEntry {
                value: b.as_str(),
                label: b.label(),
                description: b.description(),
            })
            .collect(),
        timelines: Timeline::ALL
            .iter()
            .map(|t| OptionEntry {
                value: t.as_str(),
                label: t.label(),
                description: t.description(),
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

async fn generate_outline(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProjectOutline>, ApiError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid request body".into()))?;

    let idea = match body.get("idea") {
        Some(Value::String(idea)) => idea.clone(),
        Some(_) => return Err(ApiError::BadRequest("Expected string".into())),
        None => return Err(ApiError::BadRequest("Required".into())),
    };

    let outline = state.outline.generate(&ProjectIdeaInput::new(idea)).await?;
    Ok(Json(outline))
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Load hook: the language preference travels in the `language` cookie.
fn request_language(headers: &HeaderMap) -> Language {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(language_from_cookie)
        .unwrap_or_default()
}

async fn translate(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    let language = request_language(&headers);
    let text = state.catalog.t(language, &key);
    Json(json!({ "language": language, "key": key, "text": text }))
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: String,
}

/// Save hook: persist the preference back into the cookie.
async fn set_language(Json(request): Json<LanguageRequest>) -> Result<Response, ApiError> {
    let language: Language = request.language.parse()?;
    Ok((
        [(header::SET_COOKIE, language_cookie(language))],
        Json(json!({ "language": language })),
    )
        .into_response())
}
