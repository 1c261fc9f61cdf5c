//! Session gateway: bearer-token authentication for protected routes.

pub mod middleware;

pub use middleware::{require_auth, AuthContext};
