mod handler;
mod model;

pub use handler::TeachersPage;
pub use model::{Teacher, TeacherForm};
