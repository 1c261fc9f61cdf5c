use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("email delivery failed: {0}")]
    SendFailed(String),

    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
