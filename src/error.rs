use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug)]
pub enum ApiError {
    /// 请求没有得到任何响应
    Network(String),
    /// 服务端返回了失败状态码
    Http {
        status: StatusCode,
        detail: Option<String>,
    },
    /// 客户端必填项校验失败，请求未发出
    Validation(ValidationErrors),
    /// 响应体与期望的结构不符
    Decode(String),
    /// 刷新失败，会话已清除并已跳转登录
    SessionExpired,
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 单字段校验错误的快捷构造
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        ApiError::Validation(errors)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(message) => write!(f, "{}", message),
            ApiError::Http {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => write!(f, "{}", detail),
            ApiError::Http { status, .. } => {
                write!(f, "Request failed with status code {}", status.as_u16())
            }
            ApiError::Validation(errors) => write!(f, "{}", errors),
            ApiError::Decode(message) => write!(f, "Unexpected response: {}", message),
            ApiError::SessionExpired => write!(f, "Session expired, please log in again"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status,
                detail: None,
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// 把任意错误转成给用户看的一句话：服务端 detail 优先，其次传输层信息，最后兜底文案
pub fn error_message(error: &ApiError) -> String {
    let message = match error {
        ApiError::Http {
            detail: Some(detail),
            ..
        } if !detail.trim().is_empty() => detail.clone(),
        ApiError::Network(message) | ApiError::Decode(message) if !message.trim().is_empty() => {
            error.to_string()
        }
        ApiError::Network(_) | ApiError::Decode(_) => String::new(),
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// 按字段收集的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.len() {
            0 => write!(f, "Invalid input"),
            1 => {
                let (field, message) = self.fields.iter().next().map_or(("", ""), |(k, v)| (*k, v.as_str()));
                if field.is_empty() {
                    write!(f, "{}", message)
                } else {
                    write!(f, "{}: {}", field, message)
                }
            }
            n => write!(f, "{} fields are invalid", n),
        }
    }
}
