//! Outbound transactional mail for CareLink Engine.
//!
//! Exposes the [`Notifier`] delivery seam used by the booking workflow and
//! an SMTP implementation over the Stalwart `mail-send` stack. Delivery is
//! single-attempt, fire-and-forget from the caller's point of view: the
//! result is reported synchronously and never retried here.

pub mod error;
pub mod service;

pub use error::{NotifyError, NotifyResult};
pub use service::{EmailConfig, Notifier, SmtpNotifier};
