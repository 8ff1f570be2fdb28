use std::sync::Arc;

use dashboard::{
    AppState,
    config::Config,
    navigation::LogNavigator,
    notify::LogNotifier,
    routes::auth::{AuthPhase, LoginCredentials},
    utils::peek_claims,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Using API at {}", config.api_url);

    let state = AppState::new(
        config.clone(),
        Arc::new(LogNavigator),
        Arc::new(LogNotifier),
    )
    .expect("Failed to build API client");

    let mut auth = state.auth_session();

    // 没有会话时用环境变量中的账号登录
    if !state.client.session().is_authenticated() {
        match (&config.login_email, &config.login_password) {
            (Some(email), Some(password)) => {
                let credentials = LoginCredentials::new(email.as_str(), password.as_str());
                if let Err(e) = auth.login(&state.client, &credentials).await {
                    tracing::error!("Login failed: {}", e);
                    return;
                }
            }
            _ => {
                tracing::warn!("No stored session and DASHBOARD_EMAIL/DASHBOARD_PASSWORD not set");
                return;
            }
        }
    }

    let user = match auth.mount(&state.client).await {
        AuthPhase::Authenticated(user) => user.clone(),
        _ => {
            tracing::error!("Not authenticated");
            return;
        }
    };

    let role = user
        .role()
        .map(|role| role.label())
        .unwrap_or_else(|| "Unknown".to_string());
    tracing::info!("Signed in as {} ({})", user.display_name(), role);
    let sections: Vec<&str> = auth.sections().iter().map(|s| s.label()).collect();
    tracing::info!("Accessible sections: {}", sections.join(", "));

    if let Some(token) = state.client.session().access_token() {
        match peek_claims(&token) {
            Ok(claims) => match claims.expires_at() {
                Some(expires_at) => tracing::info!("Access token valid until {}", expires_at),
                None => tracing::debug!("Access token carries no expiry"),
            },
            Err(e) => tracing::warn!("Unreadable access token: {}", e),
        }
    }

    let mut dashboard = state.dashboard();
    dashboard.load(&state.client).await;
    for (title, value) in dashboard.stats().cards() {
        tracing::info!("{}: {}", title, value);
    }
    let (collected, pending) = dashboard.stats().fee_summary();
    tracing::info!("Fees collected {} / pending {}", collected, pending);
}
