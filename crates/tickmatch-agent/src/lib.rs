//! # tickmatch-agent
//!
//! **Tick-driven limit order agent.**
//!
//! The agent holds conditional orders per product and, on every price tick,
//! executes the ones whose limit the tick satisfies:
//!
//! - **Boundary inclusive**: buys fire at `price <= limit`, sells at `price >= limit`
//! - **At-most-once**: an executed order leaves the registry under the product lock
//! - **Retry on venue failure**: a refused execution keeps the order pending
//! - **Pluggable policy**: auto-order rules run before matching, outside the core
//!
//! ## Tick Flow
//!
//! ```text
//! PriceFeed / tick pump → LimitOrderAgent::on_price_tick
//!     → rules.evaluate() → register_order()
//!     → registry slot lock → trigger check → ExecutionClient::execute()
//!     → remove on confirmation
//! ```

pub mod agent;
pub mod feed;
pub mod registry;
pub mod rules;
pub mod telemetry;

pub use agent::{
    AgentStats, ExecutedOrder, FailedExecution, LimitOrderAgent, Registration, TickReport,
};
pub use feed::{spawn_tick_pump, tick_channel, PriceFeed, PriceListener, PriceTick};
pub use registry::{OrderRegistry, ProductSlot};
pub use rules::{build_rules, AutoOrderRule, ThresholdRule};
pub use telemetry::{init_tracing, LogFormat};
