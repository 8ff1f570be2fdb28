mod handler;
mod model;

pub use handler::{AuthPhase, AuthSession};
pub use model::{AuthUser, ChangePasswordRequest, LoginCredentials, UserRole};
