use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{attach_token, log_errors};
use crate::navigation::Navigator;
use crate::result::ApiResult;
use crate::session::SessionStore;

pub const REFRESH_PATH: &str = "/auth/refresh";

/// 请求体
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// application/x-www-form-urlencoded
    Form(Vec<(String, String)>),
}

impl Body {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> ApiResult<Self> {
        Ok(Body::Json(serde_json::to_value(body)?))
    }
}

/// 查询参数，值为 None 的键不会出现在 URL 中
pub type Params<'a> = [(&'a str, Option<String>)];

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// 带鉴权的 REST 客户端。
///
/// 每个请求都从会话中取访问令牌；收到 401 时用刷新令牌换一次新令牌并重放原请求，
/// 同一个请求最多重放一次。刷新失败或没有刷新令牌时清空会话并跳转登录。
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: Arc::from(config.api_url.trim_end_matches('/')),
            session,
            navigator,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &Params<'_>) -> ApiResult<T> {
        self.request(Method::GET, path, Body::Empty, params).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Body::json(body)?, &[]).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Body::json(body)?, &[]).await
    }

    /// 删除成功时响应体可能为空，也可能是一段提示，一律忽略
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request::<serde_json::Value>(Method::DELETE, path, Body::Empty, &[])
            .await
            .map(|_| ())
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> ApiResult<T> {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.request(Method::POST, path, Body::Form(fields), &[]).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        params: &Params<'_>,
    ) -> ApiResult<T> {
        let mut retried = false;
        loop {
            let sent_token = self.session.access_token();
            let response = self.send_once(&method, path, &body, params).await?;

            // 未携带令牌的请求（如登录）收到 401 只是普通失败
            if response.status() == StatusCode::UNAUTHORIZED && !retried && sent_token.is_some() {
                retried = true;
                if self.recover_session(sent_token.as_deref()).await {
                    tracing::debug!("Replaying {} {} with refreshed token", method, path);
                    continue;
                }
                return Err(ApiError::SessionExpired);
            }

            let response = log_errors(response).await?;
            return decode(response).await;
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: &Body,
        params: &Params<'_>,
    ) -> ApiResult<Response> {
        let query: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            request = request.query(&query);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Form(fields) => request.form(fields),
        };
        let request = attach_token(request, &self.session);

        tracing::debug!(%request_id, "{} {}", method, path);
        request.send().await.map_err(|e| {
            tracing::warn!(%request_id, "Request {} {} failed: {}", method, path, e);
            ApiError::Network(e.to_string())
        })
    }

    /// 401 之后尝试恢复会话，返回是否可以重放
    async fn recover_session(&self, stale_token: Option<&str>) -> bool {
        let _guard = self.refresh_lock.lock().await;

        match self.session.access_token() {
            // 等锁期间别的请求已经刷新过令牌
            Some(current) if Some(current.as_str()) != stale_token => return true,
            // 别的请求已经结束了会话，不再重复跳转登录页
            None if stale_token.is_some() => return false,
            _ => {}
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::info!("Access token rejected and no refresh token stored");
            self.end_session();
            return false;
        };

        match self.refresh(&refresh_token).await {
            Ok(access_token) => {
                self.session.set_access_token(&access_token);
                tracing::info!("Access token refreshed");
                true
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.end_session();
                false
            }
        }
    }

    /// 刷新请求不经过 401 重试逻辑
    async fn refresh(&self, refresh_token: &str) -> ApiResult<String> {
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = log_errors(response).await?;
        let body: RefreshResponse = decode(response).await?;
        Ok(body.access_token)
    }

    fn end_session(&self) {
        self.session.clear();
        self.navigator.redirect_to_login();
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(ApiError::from)?;
    // 204 等空响应按 null 解析，调用方用 () 或 Option 接收
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
