use serde::{Deserialize, Serialize};

use crate::utils::page_count;

/// 分页列表的统一信封
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub pages: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, size: u32) -> Self {
        Self {
            items,
            total,
            page,
            size,
            pages: page_count(total, size),
        }
    }

    /// 把一个完整列表视为只有一页
    pub fn single_page(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        let size = items.len() as u32;
        Self::new(items, total, 1, size)
    }
}

/// 兼容层：部分列表接口直接返回数组而不是信封，这里统一成信封
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Envelope(PaginatedResponse<T>),
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_envelope(self) -> PaginatedResponse<T> {
        match self {
            ListPayload::Envelope(envelope) => envelope,
            ListPayload::Bare(items) => PaginatedResponse::single_page(items),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.into_envelope().items
    }
}

/// 数据库记录 id
pub type Id = i64;

/// 金额、分数等字段：后端的 Decimal 可能序列化成字符串，也可能是数字
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// 同 [`number`]，允许 null
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "number")] f64);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(n)| n))
}
