// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use product_manager::state::ApiConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedBody {
    Empty,
    Json(Value),
    Multipart {
        fields: HashMap<String, String>,
        image: Option<(String, usize)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: RecordedBody,
}

/// Serwis produktów w pamięci, nagrywający żądania zapisu.
#[derive(Debug, Default)]
pub struct FakeProductService {
    products: Mutex<Vec<Value>>,
    writes: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl FakeProductService {
    pub async fn seed(&self, name: &str, description: &str, price: f64, image: Option<&str>) -> String {
        let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.products.lock().await.push(json!({
            "_id": id,
            "name": name,
            "description": description,
            "price": price,
            "image": image,
        }));
        id
    }

    pub async fn writes(&self) -> Vec<RecordedRequest> {
        self.writes.lock().await.clone()
    }

    pub async fn products(&self) -> Vec<Value> {
        self.products.lock().await.clone()
    }
}

type Shared = Arc<FakeProductService>;

async fn read_body(request: Request) -> RecordedBody {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .expect("multipart body");
        let mut fields = HashMap::new();
        let mut image = None;
        while let Some(field) = multipart.next_field().await.expect("multipart field") {
            let name = field.name().unwrap_or_default().to_string();
            if let Some(file_name) = field.file_name().map(str::to_string) {
                let bytes = field.bytes().await.expect("file bytes");
                image = Some((file_name, bytes.len()));
            } else {
                fields.insert(name, field.text().await.expect("text field"));
            }
        }
        RecordedBody::Multipart { fields, image }
    } else if content_type.starts_with("application/json") {
        let Json(value) = Json::<Value>::from_request(request, &())
            .await
            .expect("json body");
        RecordedBody::Json(value)
    } else {
        RecordedBody::Empty
    }
}

fn product_from_body(id: &str, body: &RecordedBody) -> Value {
    match body {
        RecordedBody::Json(value) => json!({
            "_id": id,
            "name": value["name"],
            "description": value["description"],
            "price": value["price"],
        }),
        RecordedBody::Multipart { fields, image } => json!({
            "_id": id,
            "name": fields.get("name"),
            "description": fields.get("description"),
            "price": fields.get("price").and_then(|p| p.parse::<f64>().ok()),
            "image": image.as_ref().map(|(name, _)| name.clone()),
        }),
        RecordedBody::Empty => json!({ "_id": id }),
    }
}

async fn list(State(service): State<Shared>) -> Json<Vec<Value>> {
    Json(service.products().await)
}

async fn create(State(service): State<Shared>, request: Request) -> (StatusCode, Json<Value>) {
    let body = read_body(request).await;
    service.writes.lock().await.push(RecordedRequest {
        method: "POST".into(),
        path: "/api/products".into(),
        body: body.clone(),
    });
    if service.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "down" })));
    }

    let id = format!("p{}", service.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let product = product_from_body(&id, &body);
    service.products.lock().await.push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn update(
    State(service): State<Shared>,
    Path(id): Path<String>,
    request: Request,
) -> (StatusCode, Json<Value>) {
    let body = read_body(request).await;
    service.writes.lock().await.push(RecordedRequest {
        method: "PUT".into(),
        path: format!("/api/products/{id}"),
        body: body.clone(),
    });
    if service.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "down" })));
    }

    let mut products = service.products.lock().await;
    match products.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(existing) => {
            let image = existing["image"].clone();
            *existing = product_from_body(&id, &body);
            if existing["image"].is_null() {
                existing["image"] = image;
            }
            (StatusCode::OK, Json(existing.clone()))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))),
    }
}

async fn remove(State(service): State<Shared>, Path(id): Path<String>) -> StatusCode {
    service.writes.lock().await.push(RecordedRequest {
        method: "DELETE".into(),
        path: format!("/api/products/{id}"),
        body: RecordedBody::Empty,
    });
    if service.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    let mut products = service.products.lock().await;
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() < before {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn broken_list() -> (StatusCode, Body) {
    (StatusCode::OK, Body::from("<html>not json</html>"))
}

/// Uruchamia serwis na losowym porcie; zwraca adres bazowy.
pub async fn spawn_fake_service() -> (String, Shared) {
    let service: Shared = Arc::new(FakeProductService::default());
    let app = Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}", axum::routing::put(update).delete(remove))
        .route("/broken/api/products", get(broken_list))
        .with_state(service.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake service");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake service");
    });

    (format!("http://{addr}"), service)
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig::new(base_url, Duration::from_secs(5)).expect("valid base url")
}
