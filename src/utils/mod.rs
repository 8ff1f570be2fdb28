use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// 总页数，total 为 0 时为 0 页
pub fn page_count(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(size as u64) as u32
}

/// 分页条中的一个位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(u32),
    /// 被折叠的页码区间
    Gap,
}

/// 分页条：首页、末页和当前页前后各一页，中间断开处用省略号
pub fn page_window(page: u32, pages: u32) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    let mut previous: Option<u32> = None;
    for p in 1..=pages {
        if p != 1 && p != pages && p.abs_diff(page) > 1 {
            continue;
        }
        if let Some(prev) = previous {
            if prev + 1 != p {
                markers.push(PageMarker::Gap);
            }
        }
        markers.push(PageMarker::Page(p));
        previous = Some(p);
    }
    markers
}

/// "Showing from–to of total" 中的 from 和 to，均为 1 起始
pub fn showing_range(page: u32, size: u32, total: u64) -> Option<(u64, u64)> {
    if total == 0 || page == 0 || size == 0 {
        return None;
    }
    let from = (page as u64 - 1) * size as u64 + 1;
    let to = (page as u64 * size as u64).min(total);
    if from > total { None } else { Some((from, to)) }
}

/// 按印度数字分组格式化金额，不保留小数，例如 ₹4,20,000
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, last_three) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            parts.push(&head[end - 2..end]);
            end -= 2;
        }
        parts.push(&head[..end]);
        parts.reverse();
        format!("{},{}", parts.join(","), last_three)
    };

    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub school_id: Option<i64>,
    pub exp: i64,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// 只解析 JWT 载荷，不校验签名和过期时间，仅用于日志诊断
pub fn peek_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims)
}
