// Shared helpers: a fake spreadsheet API and a guest list server wired to it.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use guest_list::Settings;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// In-memory stand-in for the hosted sheet. Rows are JSON objects keyed by column.
#[derive(Clone, Default)]
pub struct FakeSheet {
    rows: Arc<Mutex<Vec<Map<String, Value>>>>,
    offline: Arc<AtomicBool>,
}

impl FakeSheet {
    pub fn rows(&self) -> Vec<Map<String, Value>> {
        self.rows.lock().expect("rows mutex poisoned").clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }
}

// Both body shapes are accepted: `{"data": {...}}` and bare fields.
fn fields_of(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(data)) => data,
            Some(other) => {
                map.insert("data".to_string(), other);
                map
            }
            None => map,
        },
        _ => Map::new(),
    }
}

async fn list_rows(State(sheet): State<FakeSheet>) -> Result<Json<Value>, StatusCode> {
    if sheet.is_offline() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(Value::Array(
        sheet.rows().into_iter().map(Value::Object).collect(),
    )))
}

async fn create_row(
    State(sheet): State<FakeSheet>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if sheet.is_offline() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    sheet
        .rows
        .lock()
        .expect("rows mutex poisoned")
        .push(fields_of(body));
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "created": 1 }))))
}

async fn update_rows(
    State(sheet): State<FakeSheet>,
    Path((column, value)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if sheet.is_offline() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    let fields = fields_of(body);
    let mut rows = sheet.rows.lock().expect("rows mutex poisoned");
    let mut updated = 0;
    for row in rows
        .iter_mut()
        .filter(|row| row.get(&column).and_then(Value::as_str) == Some(value.as_str()))
    {
        row.extend(fields.clone());
        updated += 1;
    }
    Ok(Json(serde_json::json!({ "updated": updated })))
}

// Start the fake sheet on an ephemeral port and return its API base URL.
pub async fn start_fake_sheet(sheet: FakeSheet) -> String {
    let app = Router::new()
        .route("/api/v1/sheet", get(list_rows).post(create_row))
        .route("/api/v1/sheet/{column}/{value}", patch(update_rows))
        .with_state(sheet);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral sheet port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api/v1/sheet")
}

// Start a guest list server pointed at `sheet_url` and wait until it accepts connections.
pub async fn start_server(sheet_url: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    let settings = Settings {
        sheet_api_url: sheet_url,
        refresh_delay: Duration::from_millis(20),
        ..Settings::default()
    };
    tokio::spawn(async move {
        guest_list::run(listener, settings)
            .await
            .expect("server failed");
    });

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return format!("http://{addr}");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not become ready in time");
}

// Poll `GET /guests` until `predicate` holds for the snapshot.
pub async fn wait_for_view(
    client: &reqwest::Client,
    base_url: &str,
    predicate: impl Fn(&Value) -> bool,
) -> Value {
    let mut last = Value::Null;
    for _ in 0..100 {
        last = client
            .get(format!("{base_url}/guests"))
            .send()
            .await
            .expect("request should succeed")
            .json::<Value>()
            .await
            .expect("expected json view");
        if predicate(&last) {
            return last;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("view never reached the expected state; last snapshot: {last}");
}

pub fn guest_named<'a>(view: &'a Value, name: &str) -> Option<&'a Value> {
    view["guests"]
        .as_array()?
        .iter()
        .find(|guest| guest["name"] == name)
}
