//! Identity and session-token management for CareLink Engine.
//!
//! This crate provides the credential-store contract and the token service:
//! - User identity records with a closed patient/provider role set
//! - Argon2id password hashing and verification
//! - Signed access/refresh token pairs, verification, and revocation
//!
//! Storage is abstracted behind async traits so the server can plug in a
//! durable backend; an in-memory revocation store is included for
//! development and tests.

pub mod error;
pub mod models;
pub mod password;
pub mod store;
pub mod tokens;

pub use error::{IdentityError, TokenError, UnknownRole};
pub use models::{Identity, IdentitySummary, NewIdentity, Role};
pub use store::{IdentityStore, InMemoryRevocationStore, RevocationStore};
pub use tokens::{Claims, TokenConfig, TokenKind, TokenPair, TokenService};
