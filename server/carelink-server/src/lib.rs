//! CareLink Engine HTTP server.
//!
//! Care appointment booking API: patient/provider identity management with
//! an access/refresh token lifecycle, care-category reference data, and the
//! appointment booking workflow with confirmation notification.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use routes::create_app;
pub use server::CareLinkServer;
