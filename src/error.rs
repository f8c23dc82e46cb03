use thiserror::Error;

use crate::actions::ActionKind;

pub type Result<T> = std::result::Result<T, LawnError>;

#[derive(Debug, Error)]
pub enum LawnError {
    #[error("invalid configuration value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("robot start ({x}, {y}) is outside the {m}x{n} lawn")]
    PositionOutOfBounds { x: i64, y: i64, m: usize, n: usize },

    #[error("robot has no energy to {action} (energy {energy}, cost {cost})")]
    EnergyExhausted {
        action: ActionKind,
        energy: f64,
        cost: f64,
    },

    #[error("direction code {0} is not one of 0 (down), 1 (up), 2 (left), 3 (right)")]
    InvalidDirection(u8),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace export error: {0}")]
    Csv(#[from] csv::Error),
}

impl LawnError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LawnError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error ends an episode rather than signalling a bad setup.
    pub fn is_exhaustion(&self) -> bool {
        match self {
            LawnError::EnergyExhausted { .. } => true,
            _ => false,
        }
    }
}
