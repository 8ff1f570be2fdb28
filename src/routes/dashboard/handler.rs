use std::sync::Arc;

use crate::client::ApiClient;
use crate::notify::{Notice, Notifier};

use super::model::DashboardStats;

/// 首页统计；加载失败时显示空数据并提示
pub struct DashboardPage {
    stats: DashboardStats,
    loading: bool,
    notifier: Arc<dyn Notifier>,
}

impl DashboardPage {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            stats: DashboardStats::default(),
            loading: false,
            notifier,
        }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.loading = true;
        let result = DashboardStats::fetch(client).await;
        self.loading = false;

        match result {
            Ok(stats) => self.stats = stats,
            Err(e) => {
                tracing::warn!("Failed to load dashboard stats: {}", e);
                self.stats = DashboardStats::default();
                self.notifier.notify(Notice::from_error(&e));
            }
        }
    }
}
