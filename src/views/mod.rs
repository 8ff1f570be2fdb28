mod badge;
mod form;
mod list;
mod page;

pub use badge::{BadgeVariant, active_badge, attendance_badge, fee_status_badge, pass_badge};
pub use form::{Editable, FormModel, ModalForm, REQUIRED, filled};
pub use list::{FetchTicket, ListView, Listable};
pub use page::EntityPage;

/// 表格无数据时的默认提示
pub const EMPTY_MESSAGE: &str = "No records found";
