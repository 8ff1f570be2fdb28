pub mod attendance;
pub mod auth;
pub mod class;
pub mod dashboard;
pub mod exam;
pub mod fees;
pub mod student;
pub mod teacher;
