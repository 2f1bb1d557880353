//! Scripted stand-in for the storefront API.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};
use storefront_client::{ClientConfig, MemoryCredentials, MemoryNavigator, StoredToken, Storefront};

/// Mount point of the API on the stub server.
pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Scripted {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct BackendState {
    routes: HashMap<String, VecDeque<Scripted>>,
    requests: Vec<Recorded>,
}

/// Answers each `METHOD /path` with the scripted responses in order,
/// repeating the last one. Unscripted routes get a 404.
#[derive(Clone, Default)]
pub struct Backend {
    state: Arc<Mutex<BackendState>>,
}

impl Backend {
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_after(method, path, Duration::ZERO, status, body);
    }

    pub fn respond_after(
        &self,
        method: &str,
        path: &str,
        delay: Duration,
        status: u16,
        body: Value,
    ) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.respond_raw(method, path, delay, status, body);
    }

    pub fn respond_raw(
        &self,
        method: &str,
        path: &str,
        delay: Duration,
        status: u16,
        body: String,
    ) {
        let key = format!("{method} {API_PREFIX}{path}");
        self.state
            .lock()
            .unwrap()
            .routes
            .entry(key)
            .or_default()
            .push_back(Scripted {
                status,
                body,
                delay,
            });
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests that hit `METHOD /path` (path relative to the API prefix).
    pub fn hits(&self, method: &str, path: &str) -> Vec<Recorded> {
        let full = format!("{API_PREFIX}{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }

    fn next(&self, key: &str) -> Option<Scripted> {
        let mut state = self.state.lock().unwrap();
        let queue = state.routes.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    backend.state.lock().unwrap().requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let key = format!("{} {}", method, uri.path());
    let json = [(header::CONTENT_TYPE, "application/json")];
    match backend.next(&key) {
        Some(scripted) => {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            let status = StatusCode::from_u16(scripted.status).unwrap();
            (status, json, scripted.body)
        }
        None => (
            StatusCode::NOT_FOUND,
            json,
            json!({ "message": format!("Cannot {key}") }).to_string(),
        ),
    }
}

/// Start the stub on an ephemeral port and return its base URL.
pub async fn spawn(backend: Backend) -> String {
    let app = Router::new().fallback(handle).with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{API_PREFIX}")
}

pub struct Harness {
    pub backend: Backend,
    pub config: ClientConfig,
    pub credentials: Arc<MemoryCredentials>,
    pub navigator: Arc<MemoryNavigator>,
    pub shop: Storefront,
}

impl Harness {
    pub async fn start(path: &str) -> Self {
        Self::with_credentials(path, MemoryCredentials::new()).await
    }

    pub async fn signed_in(path: &str, token: &str) -> Self {
        let token = StoredToken::issue(token, chrono::Duration::days(7));
        Self::with_credentials(path, MemoryCredentials::with_token(token)).await
    }

    pub async fn with_credentials(path: &str, credentials: MemoryCredentials) -> Self {
        let backend = Backend::default();
        let base_url = spawn(backend.clone()).await;
        let config = ClientConfig::default().with_base_url(base_url);
        let credentials = Arc::new(credentials);
        let navigator = Arc::new(MemoryNavigator::new(path));
        let shop = Storefront::with_parts(&config, credentials.clone(), navigator.clone());
        Self {
            backend,
            config,
            credentials,
            navigator,
            shop,
        }
    }
}

pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": "Ana García",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

pub fn product_json(id: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "description": "",
        "price": price,
        "images": [],
        "category": "shoes",
        "brand": "Acme",
        "stock": 10,
        "rating": 4.5,
        "reviewCount": 3,
        "tags": [],
        "specifications": {},
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

/// Server cart with one line per `(item_id, product_id, price, quantity)`.
/// `total` is taken as given so tests can tell server totals from local ones.
pub fn cart_json(id: &str, lines: &[(&str, &str, f64, i64)], total: f64) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|(item_id, product_id, price, quantity)| {
            json!({
                "id": item_id,
                "productId": product_id,
                "product": product_json(product_id, *price),
                "quantity": quantity,
                "price": price * *quantity as f64,
            })
        })
        .collect();
    let item_count: i64 = lines.iter().map(|l| l.3).sum();
    json!({
        "id": id,
        "userId": "u1",
        "items": items,
        "total": total,
        "itemCount": item_count,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}
