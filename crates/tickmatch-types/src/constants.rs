//! System-wide constants for tickmatch.

/// Pending orders allowed per product under the replace policy.
pub const SINGLE_SLOT_CAPACITY: usize = 1;

/// Default cap per product when orders are queued instead of replaced.
pub const DEFAULT_MAX_ORDERS_PER_PRODUCT: usize = 16;

/// Channel depth for the async tick pump.
pub const DEFAULT_TICK_CHANNEL_CAPACITY: usize = 1024;

/// Filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "tickmatch";
