//! # tickmatch-types
//!
//! Shared types, errors, and configuration for the **tickmatch** limit order
//! agent.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`ProductId`], [`ExecutionId`]
//! - **Order model**: [`Order`], [`NewOrder`], [`OrderSide`], [`OrderStatus`], [`OrderSource`]
//! - **Execution seam**: [`ExecutionClient`], [`Confirmation`], [`ExecutionError`]
//! - **Configuration**: [`AgentConfig`], [`SlotPolicy`], [`RuleConfig`], [`ThresholdCross`]
//! - **Errors**: [`TickmatchError`] with `TM_ERR_` prefix codes
//! - **Constants**: defaults and limits

pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use tickmatch_types::{Order, OrderSide, NewOrder, ...};

pub use config::*;
pub use error::*;
pub use execution::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `tickmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
