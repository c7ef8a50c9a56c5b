use crate::agent::{ ChatAgent, ChatError };
use crate::models::chat::{ ChatMessage, ChatRequest, ChatResponse };
use std::any::Any;
use std::sync::Arc;
use axum::{
    routing::{ delete, get, post },
    Json,
    Router,
    extract::{ rejection::JsonRejection, Path, State },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any as AnyOrigin, CorsLayer };
use log::{ error, warn };

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
    pub app_name: String,
}

/// Error rendered as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Conversation not found")]
    NotFound,

    #[error("Language model unavailable")]
    Upstream,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ChatError::Completion(_) => ApiError::Upstream,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

pub fn router(agent: Arc<ChatAgent>, app_name: String) -> Router {
    let state = AppState { agent, app_name };

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/", post(chat_handler))
        .route("/api/chat/conversations/{conversation_id}/history", get(history_handler))
        .route("/api/chat/conversations/{conversation_id}", delete(clear_handler))
        .route("/api/chat/health", get(chat_health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors)
        )
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    ApiError::Internal.into_response()
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Malformed chat request: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;
    let response = state.agent
        .chat(&req.message, req.conversation_id.as_deref(), req.user_id.as_deref()).await
        .map_err(|e| {
            warn!("Chat request rejected: {}", e);
            ApiError::from(e)
        })?;
    Ok(Json(response))
}

async fn history_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>
) -> Json<Vec<ChatMessage>> {
    Json(state.agent.get_conversation_history(&conversation_id).await)
}

async fn clear_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>
) -> Result<impl IntoResponse, ApiError> {
    if state.agent.clear_conversation(&conversation_id).await {
        Ok(Json(MessageBody { message: "Conversation cleared successfully".into() }))
    } else {
        Err(ApiError::NotFound)
    }
}

async fn chat_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let conversations = state.agent.conversation_count().await;
    Json(json!({ "status": "healthy", "service": "chat", "conversations": conversations }))
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("Welcome to {} API", state.app_name),
        "description": "Where dad's love becomes memory",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": format!("{}-api", state.app_name.to_lowercase()),
    }))
}
