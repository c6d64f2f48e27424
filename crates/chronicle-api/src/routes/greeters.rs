//! Routes for the greeting bounded context.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use chronicle_bus::reply_capture::ReplyCapture;
use chronicle_core::identity::VersionedId;
use chronicle_core::notification::Notification;
use chronicle_core::unit_of_work::handle_message;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use chronicle_greeting::application::command_handlers::{
    CreateGreeterHandler, GreetPersonHandler,
};
use chronicle_greeting::application::query_handlers::{self, GreeterView};
use chronicle_greeting::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGreeterRequest {
    /// Name of the new greeter.
    pub name: String,
}

/// Request body for POST /greet.
#[derive(Debug, Deserialize)]
pub struct GreetPersonRequest {
    /// The greeter to ask.
    pub greeter_id: Uuid,
    /// The greeter version the caller last saw.
    pub version: i64,
    /// Who to greet.
    pub person: String,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Identifier of the new greeter.
    pub greeter_id: Uuid,
    /// Its version after creation.
    pub version: i64,
}

/// Response body returned after a greeting is handled.
#[derive(Debug, Serialize)]
pub struct GreetResponse {
    /// The greeter.
    pub greeter_id: Uuid,
    /// The greeter's version after this greeting.
    pub version: i64,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
    /// Replies produced while handling the command.
    pub replies: Vec<Notification>,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_greeter(
    State(state): State<AppState>,
    Json(request): Json<CreateGreeterRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let command = commands::CreateGreeter {
        correlation_id: Uuid::new_v4(),
        greeter_id: Uuid::new_v4(),
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling create_greeter command");

    let handler = CreateGreeterHandler::new(state.clock.clone());
    let handled = handle_message(state.store.clone(), state.bus.clone(), &handler, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            greeter_id: handled.output.greeter.id,
            version: handled.output.greeter.version,
        }),
    ))
}

/// POST /greet
#[instrument(skip(state, request), fields(greeter_id = %request.greeter_id))]
async fn greet_person(
    State(state): State<AppState>,
    Json(request): Json<GreetPersonRequest>,
) -> Result<Json<GreetResponse>, ApiError> {
    let command = commands::GreetPerson {
        correlation_id: Uuid::new_v4(),
        greeter: VersionedId::new(request.greeter_id, request.version),
        person: request.person,
    };

    info!(correlation_id = %command.correlation_id, "handling greet_person command");

    let capture = Arc::new(ReplyCapture::new(state.bus.clone()));
    let handler = GreetPersonHandler::new(state.clock.clone());
    let handled = handle_message(state.store.clone(), capture.clone(), &handler, command).await?;

    Ok(Json(GreetResponse {
        greeter_id: handled.output.greeter.id,
        version: handled.output.greeter.version,
        event_ids: handled.output.event_ids,
        replies: capture.take_replies()?,
    }))
}

/// GET /{greeter_id}
#[instrument(skip(state))]
async fn get_greeter(
    State(state): State<AppState>,
    Path(greeter_id): Path<Uuid>,
) -> Result<Json<GreeterView>, ApiError> {
    let view = query_handlers::get_greeter_by_id(greeter_id, &*state.store).await?;
    Ok(Json(view))
}

/// Returns the router for the greeting context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_greeter))
        .route("/greet", post(greet_person))
        .route("/{greeter_id}", get(get_greeter))
}
