#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use dashboard::{
    AppState,
    config::Config,
    navigation::NavigationLog,
    notify::NoticeLog,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

pub const EMAIL: &str = "admin@school.test";
pub const PASSWORD: &str = "secret";
const SECRET: &[u8] = b"test-secret";

#[derive(Debug, Serialize)]
struct TokenClaims {
    sub: String,
    school_id: i64,
    exp: i64,
    #[serde(rename = "type")]
    token_type: String,
    jti: String,
}

/// 生成一个带签名的令牌，每次调用都不同
pub fn mint(kind: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64;
    let claims = TokenClaims {
        sub: "1".into(),
        school_id: 1,
        exp: now + 3600,
        token_type: kind.into(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).expect("encode token")
}

/// 模拟后端收到的一次请求
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
    pub token: Option<String>,
}

impl Hit {
    pub fn query_has(&self, key: &str, value: &str) -> bool {
        self.query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .any(|pair| pair == format!("{}={}", key, value))
    }
}

#[derive(Default)]
pub struct Backend {
    access: Mutex<HashSet<String>>,
    refresh: Mutex<HashSet<String>>,
    stubs: Mutex<HashMap<(Method, String), (StatusCode, Value)>>,
    hits: Mutex<Vec<Hit>>,
    refresh_calls: AtomicUsize,
    login_calls: AtomicUsize,
}

impl Backend {
    /// 签发一对有效令牌
    pub fn issue(&self) -> (String, String) {
        let access = mint("access");
        let refresh = mint("refresh");
        self.access.lock().unwrap().insert(access.clone());
        self.refresh.lock().unwrap().insert(refresh.clone());
        (access, refresh)
    }

    /// 让访问令牌失效，下一次请求会收到 401
    pub fn expire(&self, access: &str) {
        self.access.lock().unwrap().remove(access);
    }

    pub fn revoke_refresh(&self, refresh: &str) {
        self.refresh.lock().unwrap().remove(refresh);
    }

    pub fn stub(&self, method: Method, path: &str, status: u16, body: Value) {
        self.stubs.lock().unwrap().insert(
            (method, path.to_string()),
            (StatusCode::from_u16(status).expect("status"), body),
        );
    }

    pub fn stub_me(&self, role: &str) {
        self.stub(
            Method::GET,
            "/auth/me",
            200,
            json!({
                "id": 1,
                "school_id": 1,
                "email": EMAIL,
                "full_name": "Priya Sharma",
                "is_active": true,
                "role": role,
                "roles": [role]
            }),
        );
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, method: Method, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.hits_for(method, path).len()
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    refresh_token: String,
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn login(State(backend): State<Arc<Backend>>, Form(form): Form<LoginForm>) -> Response {
    backend.login_calls.fetch_add(1, Ordering::SeqCst);
    if form.username != EMAIL || form.password != PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    let (access, refresh) = backend.issue();
    Json(json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    }))
    .into_response()
}

async fn refresh(State(backend): State<Arc<Backend>>, Json(body): Json<RefreshBody>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if !backend.refresh.lock().unwrap().contains(&body.refresh_token) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }
    let access = mint("access");
    backend.access.lock().unwrap().insert(access.clone());
    Json(json!({ "access_token": access, "token_type": "bearer" })).into_response()
}

async fn handle(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    body: Bytes,
) -> Response {
    let token = auth.map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());
    backend.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        token: token.clone(),
    });

    let authorized = token
        .as_ref()
        .is_some_and(|t| backend.access.lock().unwrap().contains(t));
    if !authorized {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }

    let stub = backend
        .stubs
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned();
    match stub {
        Some((status, body)) if body.is_null() => status.into_response(),
        Some((status, body)) => (status, Json(body)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Not Found"),
    }
}

/// 在随机端口上启动模拟后端
pub async fn spawn_backend() -> (Arc<Backend>, String) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .fallback(handle)
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (backend, format!("http://{}", addr))
}

pub struct Harness {
    pub backend: Arc<Backend>,
    pub state: AppState,
    pub navigation: Arc<NavigationLog>,
    pub notices: Arc<NoticeLog>,
}

impl Harness {
    /// 未登录的客户端
    pub async fn new() -> Self {
        let (backend, base_url) = spawn_backend().await;
        let navigation = Arc::new(NavigationLog::default());
        let notices = Arc::new(NoticeLog::default());
        let state = AppState::new(Config::for_api(base_url), navigation.clone(), notices.clone())
            .expect("client");
        Self {
            backend,
            state,
            navigation,
            notices,
        }
    }

    /// 已持有有效令牌的客户端
    pub async fn signed_in() -> Self {
        let harness = Self::new().await;
        let (access, refresh) = harness.backend.issue();
        harness.state.client.session().set(&access, &refresh);
        harness
    }

    pub fn access_token(&self) -> String {
        self.state
            .client
            .session()
            .access_token()
            .expect("access token")
    }
}

pub fn envelope(items: Value, total: u64, page: u32, size: u32) -> Value {
    let pages = if size == 0 { 0 } else { total.div_ceil(size as u64) };
    json!({ "items": items, "total": total, "page": page, "size": size, "pages": pages })
}

pub fn student(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "school_id": 1,
        "admission_number": format!("ADM{:03}", id),
        "full_name": name,
        "date_of_birth": "2012-04-01",
        "gender": "Female",
        "is_active": true
    })
}
