use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Mail delivery is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to read attachment: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("Failed to build the message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
