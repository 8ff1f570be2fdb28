mod handler;
mod model;

pub use handler::{FeeStats, FeesPage, PaymentModal};
pub use model::{Invoice, InvoiceStatus, Payment, PaymentForm, PaymentMethod, validate_payment};
