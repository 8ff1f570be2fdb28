use reqwest::Response;
use tracing::error;

use crate::error::ApiError;
use crate::result::ErrorBody;

/// 非成功响应转成 `ApiError::Http`，5xx 同时记录状态码和响应体
pub async fn log_errors(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let bytes = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read error response body: {}", e);
            return Err(ApiError::Http {
                status,
                detail: None,
            });
        }
    };
    let body_str = String::from_utf8_lossy(&bytes);

    if status.is_server_error() {
        error!(
            "Server error occurred - Status: {}, Path: {}, Body: {}",
            status, url, body_str
        );
    } else {
        tracing::debug!("Request to {} rejected with {}", url, status);
    }

    let detail = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.detail_message());
    Err(ApiError::Http { status, detail })
}
