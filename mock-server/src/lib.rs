use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Timestamp stamped on every note, RFC 3339.
pub const CREATED_AT: &str = "2024-05-01T12:30:00Z";

/// Bearer token `/protected` accepts.
pub const VALID_TOKEN: &str = "let-me-in";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
    pub pinned: bool,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct CreateNote {
    pub text: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Deserialize)]
pub struct PatchNote {
    pub text: Option<String>,
    pub pinned: Option<bool>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Note>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/garbage", get(garbage))
        .route("/broken", get(broken))
        .route("/slow", get(slow))
        .route("/protected", get(protected))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(replace_note).patch(patch_note).delete(delete_note),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Reflects the request back as JSON.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({ "status": code }))))
}

async fn garbage() -> &'static str {
    "<html>definitely not json</html>"
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>upstream exploded</html>")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "id": 0 }))
}

async fn protected(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let expected = format!("Bearer {VALID_TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(Json(json!({ "granted": true }))),
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn list_notes(State(db): State<Db>) -> Json<Vec<Note>> {
    let notes = db.read().await;
    Json(notes.values().cloned().collect())
}

async fn create_note(State(db): State<Db>, Json(input): Json<CreateNote>) -> (StatusCode, Json<Note>) {
    let note = Note {
        id: Uuid::new_v4(),
        text: input.text,
        pinned: input.pinned,
        created_at: CREATED_AT.to_string(),
    };
    db.write().await.insert(note.id, note.clone());
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Note>, StatusCode> {
    let notes = db.read().await;
    notes.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateNote>,
) -> Result<Json<Note>, StatusCode> {
    let mut notes = db.write().await;
    let note = notes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    note.text = input.text;
    note.pinned = input.pinned;
    Ok(Json(note.clone()))
}

async fn patch_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<PatchNote>,
) -> Result<Json<Note>, StatusCode> {
    let mut notes = db.write().await;
    let note = notes.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(text) = input.text {
        note.text = text;
    }
    if let Some(pinned) = input.pinned {
        note.pinned = pinned;
    }
    Ok(Json(note.clone()))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    let mut notes = db.write().await;
    notes.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
