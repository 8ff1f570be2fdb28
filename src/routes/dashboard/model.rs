use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::number;
use crate::result::ApiResult;
use crate::utils::format_inr;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceTrend {
    pub day: String,
    pub present: u32,
    pub absent: u32,
}

impl AttendanceTrend {
    /// 当天出勤率，没有记录时为 0
    pub fn percentage(&self) -> f64 {
        let total = self.present + self.absent;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.present) * 100.0 / f64::from(total)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeeCollection {
    pub month: String,
    #[serde(deserialize_with = "number")]
    pub collected: f64,
    #[serde(deserialize_with = "number")]
    pub pending: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_teachers: u64,
    #[serde(default, deserialize_with = "number")]
    pub today_attendance_pct: f64,
    #[serde(default)]
    pub pending_fees_count: u64,
    #[serde(default)]
    pub attendance_trend: Vec<AttendanceTrend>,
    #[serde(default)]
    pub fee_collection: Vec<FeeCollection>,
}

impl DashboardStats {
    pub async fn fetch(client: &ApiClient) -> ApiResult<DashboardStats> {
        client.get("/dashboard/stats", &[]).await
    }

    pub fn is_empty(&self) -> bool {
        *self == DashboardStats::default()
    }

    /// (day, 出勤率) 序列
    pub fn attendance_percentages(&self) -> Vec<(&str, f64)> {
        self.attendance_trend
            .iter()
            .map(|t| (t.day.as_str(), t.percentage()))
            .collect()
    }

    pub fn total_collected(&self) -> f64 {
        self.fee_collection.iter().map(|f| f.collected).sum()
    }

    pub fn total_pending(&self) -> f64 {
        self.fee_collection.iter().map(|f| f.pending).sum()
    }

    /// 统计卡片：(标题, 值)
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Total Students", self.total_students.to_string()),
            ("Total Teachers", self.total_teachers.to_string()),
            ("Today Attendance", format!("{}%", self.today_attendance_pct)),
            ("Pending Fees", self.pending_fees_count.to_string()),
        ]
    }

    pub fn fee_summary(&self) -> (String, String) {
        (format_inr(self.total_collected()), format_inr(self.total_pending()))
    }
}
