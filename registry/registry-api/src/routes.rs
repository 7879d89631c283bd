use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use registry_core::{
    error::RegistryError,
    models::{TokenDraft, TokenRecord},
    store::TokenStore,
};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TokenStore>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/tokens", get(list_tokens_handler).post(create_token_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_tokens_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TokenRecord>>, ApiError> {
    let tokens = state.store.list().await.map_err(|err| {
        tracing::error!("failed to read tokens: {err}");
        ApiError::Read
    })?;

    Ok(Json(tokens))
}

async fn create_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, JsonValue>>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenRecord>), ApiError> {
    // Only a JSON object is a draft; serde would also read an array positionally.
    let Json(fields) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let draft: TokenDraft = serde_json::from_value(JsonValue::Object(fields))
        .map_err(|err| ApiError::BadRequest(format!("invalid token payload: {err}")))?;
    let token = draft.validate().map_err(ApiError::from_create)?;

    let created = state.store.create(token).await.map_err(ApiError::from_create)?;
    tracing::info!(id = created.id, token_name = %created.token_name, "token created");

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Read,
    Save,
}

impl ApiError {
    fn from_create(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation(msg) => ApiError::BadRequest(msg),
            RegistryError::StorageUnavailable(msg) => {
                tracing::error!("failed to save token: {msg}");
                ApiError::Save
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Read => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error reading tokens data".to_string(),
            ),
            ApiError::Save => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error saving token data".to_string(),
            ),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
