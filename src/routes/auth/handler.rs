use std::collections::BTreeSet;
use std::time::Duration;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::navigation::Section;
use crate::result::ApiResult;
use crate::session::AuthTokens;

use super::model::{AuthUser, ChangePasswordRequest, LoginCredentials};

/// 会话状态：checking → authenticated | unauthenticated
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    Checking,
    Authenticated(AuthUser),
    Unauthenticated,
}

/// 页面外壳使用的登录态，对应 `{user, loading, logout}`
#[derive(Debug)]
pub struct AuthSession {
    phase: AuthPhase,
    sections: BTreeSet<Section>,
    profile_timeout: Duration,
}

impl AuthSession {
    pub fn new(profile_timeout: Duration) -> Self {
        Self {
            phase: AuthPhase::Checking,
            sections: BTreeSet::new(),
            profile_timeout,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match &self.phase {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn loading(&self) -> bool {
        self.phase == AuthPhase::Checking
    }

    /// 当前用户可见的入口，未登录时为空
    pub fn sections(&self) -> &BTreeSet<Section> {
        &self.sections
    }

    pub fn can_access(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    /// 页面挂载时校验会话。已经登录时重复挂载不会再次请求。
    pub async fn mount(&mut self, client: &ApiClient) -> &AuthPhase {
        if matches!(self.phase, AuthPhase::Authenticated(_)) {
            if client.session().is_authenticated() {
                return &self.phase;
            }
            // 客户端已经结束会话并跳转过登录页，这里只丢掉旧用户
            tracing::debug!("Session ended since last mount, dropping cached user");
            self.become_unauthenticated();
            return &self.phase;
        }
        self.phase = AuthPhase::Checking;

        if !client.session().is_authenticated() {
            tracing::debug!("No access token stored, redirecting to login");
            self.become_unauthenticated();
            client.navigator().redirect_to_login();
            return &self.phase;
        }

        // 资料请求必须在超时内结束，不能一直停在 checking
        let outcome = match tokio::time::timeout(self.profile_timeout, AuthUser::me(client)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Profile fetch did not finish within {:?}",
                    self.profile_timeout
                );
                Err(ApiError::Network("Profile request timed out".into()))
            }
        };

        match outcome {
            Ok(user) => {
                tracing::info!("Session restored for {}", user.email);
                self.become_authenticated(user);
            }
            Err(e) => {
                tracing::warn!("Session bootstrap failed: {}", e);
                self.become_unauthenticated();
                // SessionExpired 时客户端已经清空会话并跳转过了
                if !matches!(e, ApiError::SessionExpired) {
                    client.session().clear();
                    client.navigator().redirect_to_login();
                }
            }
        }
        &self.phase
    }

    /// 表单登录，成功后拉取当前用户
    pub async fn login(
        &mut self,
        client: &ApiClient,
        credentials: &LoginCredentials,
    ) -> ApiResult<&AuthUser> {
        let tokens = AuthTokens::login(client, credentials).await?;
        client
            .session()
            .set(&tokens.access_token, &tokens.refresh_token);

        match AuthUser::me(client).await {
            Ok(user) => {
                tracing::info!("Logged in as {}", user.email);
                self.become_authenticated(user);
                match &self.phase {
                    AuthPhase::Authenticated(user) => Ok(user),
                    _ => Err(ApiError::SessionExpired),
                }
            }
            Err(e) => {
                client.session().clear();
                self.become_unauthenticated();
                Err(e)
            }
        }
    }

    /// 无条件清空会话并跳转登录
    pub fn logout(&mut self, client: &ApiClient) {
        client.session().clear();
        self.become_unauthenticated();
        client.navigator().redirect_to_login();
    }

    pub async fn change_password(
        &self,
        client: &ApiClient,
        current_password: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        if new_password.trim().is_empty() {
            return Err(ApiError::invalid("new_password", "Required"));
        }
        ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        }
        .send(client)
        .await
    }

    fn become_authenticated(&mut self, user: AuthUser) {
        self.sections = user.sections();
        self.phase = AuthPhase::Authenticated(user);
    }

    fn become_unauthenticated(&mut self) {
        self.sections.clear();
        self.phase = AuthPhase::Unauthenticated;
    }
}
