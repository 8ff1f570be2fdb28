use crate::views::EntityPage;

use super::model::Teacher;

/// 教师列表页
pub type TeachersPage = EntityPage<Teacher>;
