//! The execution venue seam.
//!
//! The agent never talks to a venue directly; it holds an
//! [`ExecutionClient`] and sends `(side, product, amount)` instructions
//! through it. Venues are expected to answer synchronously.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ExecutionError, ExecutionId, OrderSide, ProductId};

/// Proof that the venue accepted an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub execution_id: ExecutionId,
    pub side: OrderSide,
    pub product_id: ProductId,
    pub amount: u64,
    pub confirmed_at: DateTime<Utc>,
}

impl Confirmation {
    #[must_use]
    pub fn new(side: OrderSide, product_id: &ProductId, amount: u64) -> Self {
        Self {
            execution_id: ExecutionId::new(),
            side,
            product_id: product_id.clone(),
            amount,
            confirmed_at: Utc::now(),
        }
    }
}

/// Outbound interface to the execution venue.
pub trait ExecutionClient: Send + Sync {
    fn buy(
        &self,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError>;

    fn sell(
        &self,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError>;

    /// Dispatch on `side`.
    fn execute(
        &self,
        side: OrderSide,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError> {
        match side {
            OrderSide::Buy => self.buy(product_id, amount),
            OrderSide::Sell => self.sell(product_id, amount),
        }
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// One instruction received by [`RecordingExecutionClient`].
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub side: OrderSide,
    pub product_id: ProductId,
    pub amount: u64,
}

/// In-memory venue that records every instruction.
///
/// `fail_next(n)` makes the next `n` calls return
/// [`ExecutionError::Unavailable`]; failed calls are recorded too.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingExecutionClient {
    calls: parking_lot::Mutex<Vec<RecordedCall>>,
    failures_left: parking_lot::Mutex<usize>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingExecutionClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, n: usize) {
        *self.failures_left.lock() = n;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(
        &self,
        side: OrderSide,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError> {
        self.calls.lock().push(RecordedCall {
            side,
            product_id: product_id.clone(),
            amount,
        });
        let mut left = self.failures_left.lock();
        if *left > 0 {
            *left -= 1;
            return Err(ExecutionError::Unavailable {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(Confirmation::new(side, product_id, amount))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl ExecutionClient for RecordingExecutionClient {
    fn buy(
        &self,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError> {
        self.record(OrderSide::Buy, product_id, amount)
    }

    fn sell(
        &self,
        product_id: &ProductId,
        amount: u64,
    ) -> std::result::Result<Confirmation, ExecutionError> {
        self.record(OrderSide::Sell, product_id, amount)
    }
}
