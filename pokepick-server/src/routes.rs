use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::contact::{ContactForm, ContactRepository, MemoryContactRepository};
use crate::error::{ApiError, Result, MESSAGE_NOT_FOUND, MISSING_POKEMON_ID};
use crate::team::{is_present, MemoryTeamRepository, TeamRepository};

pub const BANNER: &str = "Pokepick backend running";
const THANK_YOU: &str = "Thank you for your message! We'll get back to you soon.";

#[derive(Clone)]
pub struct AppState {
    pub team: Arc<dyn TeamRepository>,
    pub contact: Arc<dyn ContactRepository>,
}

impl AppState {
    pub fn in_memory() -> Self {
        Self {
            team: Arc::new(MemoryTeamRepository::default()),
            contact: Arc::new(MemoryContactRepository::default()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let team = Router::new()
        .route("/", get(get_team))
        .route("/add", post(add_member))
        .route("/remove", post(remove_member))
        .route("/clear", post(clear_team));
    let contact = Router::new()
        .route("/submit", post(submit_contact))
        .route("/messages", get(list_messages))
        .route("/messages/{id}/read", put(mark_read))
        .route("/messages/{id}", delete(delete_message));

    Router::new()
        .route("/", get(banner))
        .nest("/api/team", team)
        .nest("/api/contact", contact)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// An empty body reads as `{}`; anything else must be valid JSON.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejecting request body");
        ApiError::bad_request(format!("Invalid JSON body: {err}"))
    })
}

#[derive(Debug, Default, Deserialize)]
struct AddRequest {
    #[serde(default)]
    pokemon: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RemoveRequest {
    #[serde(default)]
    id: Option<Value>,
}

async fn banner() -> &'static str {
    BANNER
}

async fn get_team(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "team": state.team.team().await }))
}

async fn add_member(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let request: AddRequest = parse_body(&body)?;
    let pokemon = request.pokemon.unwrap_or(Value::Null);
    let team = state.team.add(pokemon).await?;
    Ok(Json(json!({ "team": team })))
}

async fn remove_member(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let request: RemoveRequest = parse_body(&body)?;
    let id = request
        .id
        .filter(is_present)
        .ok_or_else(|| ApiError::bad_request(MISSING_POKEMON_ID))?;
    let team = state.team.remove(&id).await;
    Ok(Json(json!({ "team": team })))
}

async fn clear_team(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "team": state.team.clear().await }))
}

async fn submit_contact(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let form: ContactForm = parse_body(&body)?;
    let message = state.contact.submit(form).await?;
    Ok(Json(json!({
        "success": true,
        "message": THANK_YOU,
        "messageId": message.id,
    })))
}

async fn list_messages(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "messages": state.contact.messages().await }))
}

async fn mark_read(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let message = state.contact.mark_read(message_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": message })))
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.contact.delete(message_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Message deleted" })))
}

/// Path ids that are not integers cannot name a message.
fn message_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| ApiError::not_found(MESSAGE_NOT_FOUND))
}
