use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::{Id, ListPayload, number};
use crate::result::ApiResult;
use crate::routes::student::Student;
use crate::views::{BadgeVariant, attendance_badge};

/// 低于该出勤率的学生在报表中标红
pub const LOW_ATTENDANCE_PCT: f64 = 75.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    #[serde(rename = "Half-Day")]
    HalfDay,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::HalfDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::HalfDay => "Half-Day",
        }
    }
}

/// 点名表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRow {
    pub student_id: Id,
    pub student_name: String,
    pub admission_number: String,
    pub status: AttendanceStatus,
}

impl AttendanceRow {
    pub fn badge(&self) -> BadgeVariant {
        attendance_badge(self.status)
    }
}

impl From<Student> for AttendanceRow {
    fn from(student: Student) -> Self {
        Self {
            student_id: student.id,
            student_name: student.full_name,
            admission_number: student.admission_number,
            status: AttendanceStatus::Present,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    pub student_id: Id,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// 一次提交整班的点名结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceMarkRequest {
    pub class_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<Id>,
    pub session_date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

impl AttendanceMarkRequest {
    pub fn from_rows(class_id: Id, session_date: NaiveDate, rows: &[AttendanceRow]) -> Self {
        Self {
            class_id,
            section_id: None,
            session_date,
            records: rows
                .iter()
                .map(|row| AttendanceRecord {
                    student_id: row.student_id,
                    status: row.status,
                    remarks: None,
                })
                .collect(),
        }
    }

    pub async fn send(&self, client: &ApiClient) -> ApiResult<serde_json::Value> {
        client.post("/attendance/mark", self).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceReport {
    pub student_id: Id,
    pub student_name: String,
    #[serde(default)]
    pub admission_number: String,
    #[serde(default)]
    pub total_days: u32,
    #[serde(default)]
    pub present: u32,
    #[serde(default)]
    pub absent: u32,
    #[serde(default)]
    pub late: u32,
    #[serde(deserialize_with = "number", alias = "attendance_percentage")]
    pub percentage: f64,
}

impl AttendanceReport {
    pub fn is_low(&self) -> bool {
        self.percentage < LOW_ATTENDANCE_PCT
    }

    pub async fn for_class(client: &ApiClient, class_id: Id) -> ApiResult<Vec<AttendanceReport>> {
        let payload: ListPayload<AttendanceReport> = client
            .get("/attendance/report", &[("class_id", Some(class_id.to_string()))])
            .await?;
        Ok(payload.into_items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_day_wire_name() {
        assert_eq!(
            serde_json::to_value(AttendanceStatus::HalfDay).unwrap(),
            serde_json::json!("Half-Day")
        );
        assert_eq!(AttendanceStatus::HalfDay.as_str(), "Half-Day");
    }

    #[test]
    fn low_attendance_threshold() {
        let report = |pct: f64| AttendanceReport {
            student_id: 1,
            student_name: "Ravi".into(),
            admission_number: "A1".into(),
            total_days: 20,
            present: 0,
            absent: 0,
            late: 0,
            percentage: pct,
        };
        assert!(report(74.9).is_low());
        assert!(!report(75.0).is_low());
        assert!(!report(100.0).is_low());
    }

    #[test]
    fn report_accepts_backend_percentage_field() {
        let report: AttendanceReport = serde_json::from_value(serde_json::json!({
            "student_id": 4, "student_name": "Meera", "total_days": 10,
            "present": 6, "absent": 4, "late": 0, "half_day": 0,
            "attendance_percentage": "60.00"
        }))
        .unwrap();
        assert_eq!(report.percentage, 60.0);
        assert!(report.is_low());
    }

    #[test]
    fn mark_request_body() {
        let rows = vec![AttendanceRow {
            student_id: 7,
            student_name: "Kiran".into(),
            admission_number: "A7".into(),
            status: AttendanceStatus::Late,
        }];
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let body = serde_json::to_value(AttendanceMarkRequest::from_rows(3, date, &rows)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "class_id": 3,
                "session_date": "2025-01-15",
                "records": [{"student_id": 7, "status": "Late"}]
            })
        );
    }
}
