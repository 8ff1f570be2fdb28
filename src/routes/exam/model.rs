use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::{Id, ListPayload, number, optional_number};
use crate::error::ValidationErrors;
use crate::result::ApiResult;
use crate::views::{BadgeVariant, FormModel, REQUIRED, filled, pass_badge};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExamType {
    #[serde(rename = "Unit Test")]
    UnitTest,
    #[serde(rename = "Mid Term")]
    MidTerm,
    Final,
    Monthly,
}

impl ExamType {
    pub const ALL: [ExamType; 4] = [
        ExamType::UnitTest,
        ExamType::MidTerm,
        ExamType::Final,
        ExamType::Monthly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExamType::UnitTest => "Unit Test",
            ExamType::MidTerm => "Mid Term",
            ExamType::Final => "Final",
            ExamType::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exam {
    pub id: Id,
    #[serde(default)]
    pub school_id: Option<Id>,
    #[serde(default)]
    pub academic_year_id: Option<Id>,
    pub name: String,
    pub exam_type: ExamType,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, alias = "is_published")]
    pub is_active: bool,
}

impl Exam {
    /// 后端可能返回信封或裸数组
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Exam>> {
        let payload: ListPayload<Exam> = client.get("/exams", &[]).await?;
        Ok(payload.into_items())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamSchedule {
    pub id: Id,
    pub exam_id: Id,
    pub class_id: Id,
    #[serde(default)]
    pub subject_id: Option<Id>,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default, alias = "date")]
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(deserialize_with = "number")]
    pub max_marks: f64,
    #[serde(deserialize_with = "number", alias = "passing_marks")]
    pub pass_marks: f64,
}

impl ExamSchedule {
    pub async fn for_exam(client: &ApiClient, exam_id: Id) -> ApiResult<Vec<ExamSchedule>> {
        let path = format!("/exams/{}/schedule", exam_id);
        let payload: ListPayload<ExamSchedule> = client.get(&path, &[]).await?;
        Ok(payload.into_items())
    }

    pub fn accepts(&self, marks: f64) -> bool {
        marks.is_finite() && (0.0..=self.max_marks).contains(&marks)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mark {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub exam_schedule_id: Option<Id>,
    pub student_id: Id,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub admission_number: String,
    #[serde(default, deserialize_with = "optional_number")]
    pub marks_obtained: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub max_marks: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub is_pass: Option<bool>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Mark {
    /// 未判定及格与否时不显示
    pub fn badge(&self) -> Option<BadgeVariant> {
        self.is_pass.map(pass_badge)
    }

    pub async fn for_schedule(client: &ApiClient, schedule_id: Id) -> ApiResult<Vec<Mark>> {
        let payload: ListPayload<Mark> = client
            .get(
                "/exams/marks",
                &[("exam_schedule_id", Some(schedule_id.to_string()))],
            )
            .await?;
        Ok(payload.into_items())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkEntry {
    pub student_id: Id,
    /// 未录入时发送 null
    pub marks_obtained: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// 一个科目场次的成绩批量上传，包含当前加载的每一行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarksUpload {
    pub exam_schedule_id: Id,
    pub records: Vec<MarkEntry>,
}

impl MarksUpload {
    pub fn from_marks(exam_schedule_id: Id, marks: &[Mark]) -> Self {
        Self {
            exam_schedule_id,
            records: marks
                .iter()
                .map(|m| MarkEntry {
                    student_id: m.student_id,
                    marks_obtained: m.marks_obtained,
                    remarks: m.remarks.clone(),
                })
                .collect(),
        }
    }

    pub async fn send(&self, client: &ApiClient) -> ApiResult<serde_json::Value> {
        client.post("/exams/marks/upload", self).await
    }
}

/// 新建考试表单
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExamForm {
    pub name: String,
    pub exam_type: Option<ExamType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year_id: Option<Id>,
}

impl ExamForm {
    pub async fn create(&self, client: &ApiClient) -> ApiResult<Exam> {
        client.post("/exams/create", self).await
    }
}

impl FormModel for ExamForm {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("name", filled(&self.name)),
            ("exam_type", self.exam_type.is_some()),
            ("start_date", self.start_date.is_some()),
            ("end_date", self.end_date.is_some()),
        ]
    }

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for (field, filled) in self.required_fields() {
            if !filled {
                errors.add(field, REQUIRED);
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.add("end_date", "End date must be on or after start date");
            }
        }
        errors
    }
}
