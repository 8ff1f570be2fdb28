mod handler;
mod model;

pub use handler::{AttendancePage, Tab};
pub use model::{
    AttendanceMarkRequest, AttendanceRecord, AttendanceReport, AttendanceRow, AttendanceStatus,
    LOW_ATTENDANCE_PCT,
};
