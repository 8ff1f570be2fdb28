mod handler;
mod model;

pub use handler::{ExamModal, ExamsPage, MarksSheet, ScheduleTicket};
pub use model::{Exam, ExamForm, ExamSchedule, ExamType, Mark, MarkEntry, MarksUpload};
