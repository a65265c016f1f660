#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use bookshelf_client::client::ApiClient;
use bookshelf_client::config::Config;
use bookshelf_client::services::book_service::BookService;

/// In-memory backing state for the stub API, shared with the test body so
/// it can seed data and assert on what the client actually sent.
#[derive(Default)]
pub struct ApiState {
    pub books: Vec<Value>,
    pub next_id: i64,
    pub genres: Vec<String>,
    /// Respond 500 to genre lookups.
    pub fail_genres: bool,
    /// Delay the first list request by this long, to simulate a slow
    /// response overtaken by a later one.
    pub delay_first_list_ms: u64,
    /// Name filter of every list request received, in order.
    pub list_queries: Vec<Option<String>>,
    pub create_count: usize,
    pub last_create_fields: Option<HashMap<String, String>>,
    /// File name and byte length of the last uploaded cover.
    pub last_image: Option<(String, usize)>,
    /// Raw JSON body of the last update request.
    pub last_update_body: Option<Value>,
}

pub type SharedState = Arc<Mutex<ApiState>>;

pub struct StubApi {
    pub base_url: String,
    pub state: SharedState,
}

pub async fn spawn_api(initial: ApiState) -> StubApi {
    let state: SharedState = Arc::new(Mutex::new(initial));

    let app = Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/book", get(list_books).post(create_book))
                .route("/book/{id}", put(update_book).delete(delete_book))
                .route("/book/genres", get(list_genres))
                .route("/book/statuses", get(list_statuses))
                .with_state(state.clone()),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubApi {
        base_url: format!("http://{addr}/api/v1/"),
        state,
    }
}

pub fn service_for(stub: &StubApi) -> BookService {
    let config = Config {
        api_base_url: stub.base_url.clone(),
        ..Config::default()
    };
    BookService::new(ApiClient::new(&config).unwrap())
}

/// Book record the way the server would emit it.
pub fn book_json(id: i64, name: &str, genre: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "genre": genre,
        "author": null,
        "status": null,
        "image_url": null,
        "pages": null,
        "year": null,
        "created_at": "2026-08-01T10:00:00Z",
    })
}

async fn list_books(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let delay = {
        let mut s = state.lock().unwrap();
        s.list_queries.push(params.get("name").cloned());
        if s.delay_first_list_ms > 0 && s.list_queries.len() == 1 {
            Some(Duration::from_millis(s.delay_first_list_ms))
        } else {
            None
        }
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let s = state.lock().unwrap();
    let filter = params.get("name").map(|n| n.to_lowercase());
    let books: Vec<Value> = s
        .books
        .iter()
        .filter(|b| match &filter {
            Some(q) => b["name"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(q),
            None => true,
        })
        .cloned()
        .collect();
    Json(Value::Array(books))
}

async fn create_book(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image: Option<(String, usize)> = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            image = Some((file_name, bytes.len()));
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }

    let mut s = state.lock().unwrap();
    s.create_count += 1;
    s.next_id += 1;
    let book = json!({
        "id": s.next_id,
        "name": fields.get("name").cloned().unwrap_or_default(),
        "genre": fields.get("genre"),
        "author": fields.get("author"),
        "status": fields.get("book_status"),
        "image_url": image.as_ref().map(|(f, _)| format!("media\\covers\\{f}")),
        "pages": fields.get("pages").and_then(|p| p.parse::<u32>().ok()),
        "year": fields.get("year").and_then(|y| y.parse::<i32>().ok()),
        "created_at": "2026-08-29T12:00:00Z",
    });
    s.last_create_fields = Some(fields);
    s.last_image = image;
    s.books.push(book.clone());
    (StatusCode::CREATED, Json(book))
}

async fn update_book(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().unwrap();
    s.last_update_body = Some(body.clone());

    let book = s
        .books
        .iter_mut()
        .find(|b| b["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;

    if let (Value::Object(entry), Value::Object(patch)) = (&mut *book, body) {
        for (key, value) in patch {
            entry.insert(key, value);
        }
    }
    Ok(Json(book.clone()))
}

async fn delete_book(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut s = state.lock().unwrap();
    let before = s.books.len();
    s.books.retain(|b| b["id"] != json!(id));
    if s.books.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_genres(State(state): State<SharedState>) -> Result<Json<Vec<String>>, StatusCode> {
    let s = state.lock().unwrap();
    if s.fail_genres {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(s.genres.clone()))
}

async fn list_statuses() -> Json<Value> {
    Json(json!([
        { "label": "Want to read", "value": "want_to_read" },
        { "label": "Reading", "value": "reading" },
        { "label": "Finished", "value": "finished" },
        { "label": "Dropped", "value": "dropped" },
    ]))
}
