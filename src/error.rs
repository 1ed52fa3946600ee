use thiserror::Error;

/// Errors raised when building a simulation or adding vehicles to it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid vehicle attributes: {reason}")]
    InvalidVehicle { reason: &'static str },

    #[error("invalid simulation parameters: {reason}")]
    InvalidParams { reason: &'static str },
}

impl SimError {
    pub(crate) fn vehicle(reason: &'static str) -> Self {
        Self::InvalidVehicle { reason }
    }

    pub(crate) fn params(reason: &'static str) -> Self {
        Self::InvalidParams { reason }
    }
}
