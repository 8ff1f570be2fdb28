mod handler;
mod model;

pub use handler::StudentsPage;
pub use model::{Gender, Student, StudentForm};
