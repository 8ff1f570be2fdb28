use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::common::{Id, ListPayload};
use crate::result::ApiResult;
use crate::views::{BadgeVariant, Editable, FormModel, Listable, active_badge, filled};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: Id,
    pub school_id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    pub admission_number: String,
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub class_id: Option<Id>,
    #[serde(default)]
    pub section_id: Option<Id>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub section_name: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Student {
    pub fn status_badge(&self) -> (BadgeVariant, &'static str) {
        active_badge(self.is_active)
    }

    /// 表格中的班级列，例如 "Class 5 – A"，没有班级时为 "—"
    pub fn class_label(&self) -> String {
        match (&self.class_name, &self.section_name) {
            (Some(class), Some(section)) => format!("{} – {}", class, section),
            (Some(class), None) => class.clone(),
            _ => "—".to_string(),
        }
    }

    /// 某个班级的全部学生（点名名单）
    pub async fn roster(client: &ApiClient, class_id: Id, size: u32) -> ApiResult<Vec<Student>> {
        let payload: ListPayload<Student> = client
            .get(
                Self::COLLECTION,
                &[
                    ("class_id", Some(class_id.to_string())),
                    ("size", Some(size.to_string())),
                ],
            )
            .await?;
        Ok(payload.into_items())
    }
}

impl Listable for Student {
    const COLLECTION: &'static str = "/students";

    fn id(&self) -> Id {
        self.id
    }
}

/// 新建/编辑学生表单
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudentForm {
    pub admission_number: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<Id>,
}

impl FormModel for StudentForm {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("admission_number", filled(&self.admission_number)),
            ("full_name", filled(&self.full_name)),
            ("date_of_birth", self.date_of_birth.is_some()),
            ("gender", self.gender.is_some()),
        ]
    }
}

impl Editable for Student {
    type Form = StudentForm;

    const NOUN: &'static str = "Student";

    fn to_form(&self) -> StudentForm {
        StudentForm {
            admission_number: self.admission_number.clone(),
            full_name: self.full_name.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            class_id: self.class_id,
            section_id: self.section_id,
        }
    }
}
