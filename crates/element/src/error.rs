use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
}

impl ElementError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ElementError::InvalidGeometry {
            reason: reason.into(),
        }
    }
}
