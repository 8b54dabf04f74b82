//! Error types for the tickmatch limit order agent.
//!
//! All errors use the `TM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Registry errors
//! - 3xx: Execution venue errors ([`ExecutionError`])
//! - 9xx: General / configuration errors

use thiserror::Error;

use crate::{OrderId, ProductId};

/// Failure reported by the execution venue.
///
/// These never escape the tick path: the agent logs them and keeps the
/// order pending for the next qualifying tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The venue refused the instruction.
    #[error("TM_ERR_300: Execution rejected: {reason}")]
    Rejected { reason: String },

    /// The venue could not be reached.
    #[error("TM_ERR_301: Execution venue unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Central error enum for tickmatch operations.
#[derive(Debug, Error)]
pub enum TickmatchError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The registration request failed validation.
    #[error("TM_ERR_100: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// No pending order with this ID.
    #[error("TM_ERR_101: Order not found: {0}")]
    OrderNotFound(OrderId),

    // =================================================================
    // Registry Errors (2xx)
    // =================================================================
    /// The product already holds the maximum number of pending orders.
    #[error("TM_ERR_200: Pending order limit reached for {product}: max {max}")]
    OrderLimitExceeded { product: ProductId, max: usize },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("TM_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("TM_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TickmatchError>;

impl From<serde_json::Error> for TickmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
