use crate::views::EntityPage;

use super::model::Student;

/// 学生列表页：分页、按姓名或学号搜索、新建/编辑弹窗
pub type StudentsPage = EntityPage<Student>;
