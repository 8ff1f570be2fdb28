use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::Id;
use crate::views::{BadgeVariant, Editable, FormModel, Listable, active_badge, filled};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    pub id: Id,
    pub school_id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    pub employee_id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Teacher {
    pub fn status_badge(&self) -> (BadgeVariant, &'static str) {
        active_badge(self.is_active)
    }
}

impl Listable for Teacher {
    const COLLECTION: &'static str = "/teachers";

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeacherForm {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
}

impl FormModel for TeacherForm {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("employee_id", filled(&self.employee_id)),
            ("full_name", filled(&self.full_name)),
            ("email", filled(&self.email)),
            ("phone", filled(&self.phone)),
            ("qualification", filled(&self.qualification)),
            ("joining_date", self.joining_date.is_some()),
        ]
    }
}

impl Editable for Teacher {
    type Form = TeacherForm;

    const NOUN: &'static str = "Teacher";

    fn to_form(&self) -> TeacherForm {
        TeacherForm {
            employee_id: self.employee_id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            qualification: self.qualification.clone().unwrap_or_default(),
            specialization: self.specialization.clone(),
            joining_date: self.joining_date,
        }
    }
}
