pub mod auth;

pub use auth::{auth_middleware, is_admin, AppState, AuthUser, Role};
