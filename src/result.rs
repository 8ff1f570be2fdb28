use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

/// 后端失败响应体，形如 `{"detail": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// detail 可能是字符串，也可能是字段校验错误数组
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Invoice not found"}"#).unwrap();
        assert_eq!(body.detail_message().as_deref(), Some("Invoice not found"));
    }

    #[test]
    fn validation_array_detail() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","amount"],"msg":"field required"},{"msg":"value is not a valid email"}]}"#,
        )
        .unwrap();
        assert_eq!(
            body.detail_message().as_deref(),
            Some("field required; value is not a valid email")
        );
    }

    #[test]
    fn missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_message(), None);
    }
}
