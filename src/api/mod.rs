//! API layer
//!
//! HTTP handlers for:
//! - OAuth callback (`/v1/auth`)
//! - Todo CRUD (`/v1/todos`)

mod auth;
mod todos;

pub use auth::auth_router;
pub use todos::todos_router;
