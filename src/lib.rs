use std::sync::Arc;

use config::Config;
use session::SessionStore;

pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod middleware;
pub mod navigation;
pub mod notify;
pub mod result;
pub mod session;
pub mod utils;
pub mod views;

pub mod routes;

use client::ApiClient;
use navigation::Navigator;
use notify::Notifier;
use result::ApiResult;
use routes::attendance::AttendancePage;
use routes::auth::AuthSession;
use routes::dashboard::DashboardPage;
use routes::exam::ExamsPage;
use routes::fees::FeesPage;
use routes::student::StudentsPage;
use routes::teacher::TeachersPage;

/// 各页面共享的上下文
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// 配置了 COOKIE_FILE 时会话持久化到文件，否则只保存在内存中
    pub fn new(
        config: Config,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        let session = match &config.cookie_file {
            Some(path) => SessionStore::open(path),
            None => SessionStore::in_memory(),
        };
        let client = ApiClient::new(&config, session, navigator)?;
        Ok(Self {
            config,
            client,
            notifier,
        })
    }

    pub fn auth_session(&self) -> AuthSession {
        AuthSession::new(self.config.profile_timeout())
    }

    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage::new(self.notifier.clone())
    }

    pub fn students(&self) -> StudentsPage {
        StudentsPage::new(self.config.page_size, self.notifier.clone())
    }

    pub fn teachers(&self) -> TeachersPage {
        TeachersPage::new(self.config.page_size, self.notifier.clone())
    }

    pub fn fees(&self) -> FeesPage {
        FeesPage::new(self.config.page_size, self.notifier.clone())
    }

    pub fn attendance(&self) -> AttendancePage {
        AttendancePage::new(self.config.roster_size, self.notifier.clone())
    }

    pub fn exams(&self) -> ExamsPage {
        ExamsPage::new(self.notifier.clone())
    }
}
