use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        status: Option<u16>,
    },
    #[error("sink unavailable: {0}")]
    SinkUnavailable(String),
    #[error("cannot project point: {0}")]
    Projection(String),
    #[error("cannot serialize extract: {0}")]
    Serialization(String),
}

impl PointError {
    pub fn store(message: impl Into<String>) -> Self {
        PointError::StoreUnavailable {
            message: message.into(),
            status: None,
        }
    }

    /// HTTP status reported by the backing store, if the failure came with one.
    pub fn store_status(&self) -> Option<u16> {
        match self {
            PointError::StoreUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}
