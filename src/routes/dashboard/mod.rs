mod handler;
mod model;

pub use handler::DashboardPage;
pub use model::{AttendanceTrend, DashboardStats, FeeCollection};
