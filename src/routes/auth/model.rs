use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::Id;
use crate::navigation::{Section, allowed_sections};
use crate::result::ApiResult;
use crate::session::AuthTokens;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    SchoolAdmin,
    Principal,
    Teacher,
    Accountant,
    Librarian,
    TransportManager,
    Student,
    Parent,
}

impl UserRole {
    pub const ALL: [UserRole; 9] = [
        UserRole::SuperAdmin,
        UserRole::SchoolAdmin,
        UserRole::Principal,
        UserRole::Teacher,
        UserRole::Accountant,
        UserRole::Librarian,
        UserRole::TransportManager,
        UserRole::Student,
        UserRole::Parent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::SchoolAdmin => "school_admin",
            UserRole::Principal => "principal",
            UserRole::Teacher => "teacher",
            UserRole::Accountant => "accountant",
            UserRole::Librarian => "librarian",
            UserRole::TransportManager => "transport_manager",
            UserRole::Student => "student",
            UserRole::Parent => "parent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == raw)
    }

    /// 侧边栏展示用，例如 "School Admin"
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `/auth/me` 返回的当前用户
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Id,
    pub school_id: Id,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthUser {
    /// 主角色；未知的角色名视为没有角色
    pub fn role(&self) -> Option<UserRole> {
        self.role
            .as_deref()
            .or_else(|| self.roles.first().map(String::as_str))
            .and_then(UserRole::parse)
    }

    pub fn sections(&self) -> BTreeSet<Section> {
        match self.role() {
            Some(role) => allowed_sections(role),
            None => BTreeSet::from([Section::Dashboard]),
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// 头像上显示的首字母
    pub fn initial(&self) -> char {
        self.display_name()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }

    pub async fn me(client: &ApiClient) -> ApiResult<Self> {
        client.get("/auth/me", &[]).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// 后端按 OAuth2 表单约定用 username 字段承载邮箱
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl AuthTokens {
    pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> ApiResult<Self> {
        client
            .post_form(
                "/auth/login",
                &[
                    ("username", credentials.email.as_str()),
                    ("password", credentials.password.as_str()),
                ],
            )
            .await
    }
}

impl ChangePasswordRequest {
    /// 响应体只有提示信息，不关心内容
    pub async fn send(&self, client: &ApiClient) -> ApiResult<()> {
        client
            .post::<_, serde_json::Value>("/auth/change-password", self)
            .await
            .map(|_| ())
    }
}
