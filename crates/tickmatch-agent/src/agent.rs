//! The limit order agent.
//!
//! Per tick:
//! 1. Evaluate auto-order rules; register whatever they propose
//! 2. Look up the product's pending orders (miss = no-op)
//! 3. For each triggered order, oldest first, call the execution client
//! 4. Confirmed → remove the order (`Executed`); venue error or a panicking
//!    client → keep it pending so the next qualifying tick retries
//!
//! Steps 3 and 4 run under the product's slot lock, which makes
//! trigger-execute-remove atomic per product: two racing ticks cannot both
//! execute the same order.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use tickmatch_types::{
    AgentConfig, Confirmation, ExecutionClient, ExecutionError, NewOrder, Order, OrderId,
    OrderSource, OrderStatus, ProductId, Result, SlotPolicy,
};

use crate::feed::PriceListener;
use crate::registry::OrderRegistry;
use crate::rules::{build_rules, AutoOrderRule};

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: OrderId,
    /// Order evicted under [`SlotPolicy::Replace`], marked `Cancelled`.
    pub replaced: Option<Order>,
}

/// An order the venue confirmed.
#[derive(Debug, Clone)]
pub struct ExecutedOrder {
    pub order: Order,
    pub confirmation: Confirmation,
}

/// An execution attempt the venue refused. The order is still pending.
#[derive(Debug, Clone)]
pub struct FailedExecution {
    pub order_id: OrderId,
    pub error: ExecutionError,
}

/// What a single tick did.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub product_id: ProductId,
    pub price: Decimal,
    pub auto_registered: Vec<OrderId>,
    pub executed: Vec<ExecutedOrder>,
    pub failed: Vec<FailedExecution>,
}

impl TickReport {
    fn new(product_id: &ProductId, price: Decimal) -> Self {
        Self {
            product_id: product_id.clone(),
            price,
            auto_registered: Vec::new(),
            executed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// `true` when the tick changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.auto_registered.is_empty() && self.executed.is_empty() && self.failed.is_empty()
    }
}

/// Snapshot of the agent's lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub ticks: u64,
    pub registered: u64,
    pub auto_registered: u64,
    pub replaced: u64,
    pub executed: u64,
    pub cancelled: u64,
    pub execution_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    registered: AtomicU64,
    auto_registered: AtomicU64,
    replaced: AtomicU64,
    executed: AtomicU64,
    cancelled: AtomicU64,
    execution_failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> AgentStats {
        AgentStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            registered: self.registered.load(Ordering::Relaxed),
            auto_registered: self.auto_registered.load(Ordering::Relaxed),
            replaced: self.replaced.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            execution_failures: self.execution_failures.load(Ordering::Relaxed),
        }
    }
}

/// Watches price ticks and executes conditional orders when their limit is
/// reached.
pub struct LimitOrderAgent {
    client: Arc<dyn ExecutionClient>,
    registry: OrderRegistry,
    rules: Vec<Box<dyn AutoOrderRule>>,
    counters: Counters,
}

impl LimitOrderAgent {
    /// Agent with the default configuration: one order per product, no rules.
    #[must_use]
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self {
            client,
            registry: OrderRegistry::new(SlotPolicy::default()),
            rules: Vec::new(),
            counters: Counters::default(),
        }
    }

    /// Build from a validated [`AgentConfig`].
    pub fn with_config(client: Arc<dyn ExecutionClient>, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            registry: OrderRegistry::new(config.slot_policy),
            rules: build_rules(&config.rules),
            counters: Counters::default(),
        })
    }

    /// Append an auto-order rule. Rules run in the order they were added.
    #[must_use]
    pub fn with_rule(mut self, rule: impl AutoOrderRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    // =================================================================
    // Registration
    // =================================================================

    /// Register a conditional order.
    ///
    /// Under [`SlotPolicy::Replace`] the product's previous pending order is
    /// evicted and handed back in [`Registration::replaced`].
    ///
    /// # Errors
    /// - `InvalidOrder` for a zero amount, missing or negative limit, or
    ///   blank product; nothing is stored
    /// - `OrderLimitExceeded` when a queued product is full
    pub fn register_order(&self, request: NewOrder) -> Result<Registration> {
        self.register(request, OrderSource::Operator)
    }

    fn register(&self, request: NewOrder, source: OrderSource) -> Result<Registration> {
        let order = Order::from_request(request, source)?;
        let order_id = order.id;
        let product_id = order.product_id.clone();
        let (side, amount, limit) = (order.side, order.amount, order.limit_price);

        let replaced = self.registry.insert(order)?.map(|mut replaced| {
            replaced.status = OrderStatus::Cancelled;
            Counters::bump(&self.counters.replaced);
            tracing::warn!(
                product = %product_id,
                replaced = %replaced.id,
                by = %order_id,
                "Pending order replaced"
            );
            replaced
        });
        Counters::bump(&self.counters.registered);

        tracing::debug!(
            order = %order_id,
            product = %product_id,
            side = %side,
            amount,
            limit = %limit,
            "Order registered"
        );
        Ok(Registration {
            id: order_id,
            replaced,
        })
    }

    /// Cancel a pending order.
    ///
    /// # Errors
    /// `OrderNotFound` if the order is unknown or already executed.
    pub fn cancel_order(&self, order_id: &OrderId) -> Result<Order> {
        let mut order = self.registry.remove(order_id)?;
        order.status = OrderStatus::Cancelled;
        Counters::bump(&self.counters.cancelled);
        tracing::info!(order = %order.id, product = %order.product_id, "Order cancelled");
        Ok(order)
    }

    // =================================================================
    // Tick handling
    // =================================================================

    /// Handle one tick and report what happened.
    ///
    /// Never fails: venue errors are logged and returned in the report.
    pub fn process_tick(&self, product_id: &ProductId, price: Decimal) -> TickReport {
        Counters::bump(&self.counters.ticks);
        let mut report = TickReport::new(product_id, price);

        if price.is_sign_negative() && !price.is_zero() {
            tracing::warn!(product = %product_id, price = %price, "Ignoring negative tick");
            return report;
        }

        self.apply_rules(product_id, price, &mut report);
        self.match_pending(product_id, price, &mut report);

        if report.is_noop() {
            tracing::debug!(product = %product_id, price = %price, "Tick: nothing to do");
        }
        report
    }

    fn apply_rules(&self, product_id: &ProductId, price: Decimal, report: &mut TickReport) {
        for rule in &self.rules {
            let Some(proposal) = rule.evaluate(product_id, price) else {
                continue;
            };
            match self.register(proposal, OrderSource::Rule(rule.name().to_string())) {
                Ok(registration) => {
                    Counters::bump(&self.counters.auto_registered);
                    tracing::info!(
                        rule = rule.name(),
                        order = %registration.id,
                        product = %product_id,
                        price = %price,
                        "Auto-order registered"
                    );
                    report.auto_registered.push(registration.id);
                }
                Err(err) => {
                    tracing::warn!(
                        rule = rule.name(),
                        product = %product_id,
                        error = %err,
                        "Auto-order proposal rejected"
                    );
                }
            }
        }
    }

    fn match_pending(&self, product_id: &ProductId, price: Decimal, report: &mut TickReport) {
        let outcome = self.registry.with_slot(product_id, |slot| {
            let triggered: Vec<Order> = slot.triggered_by(price).cloned().collect();
            let mut executed = Vec::new();
            let mut failed = Vec::new();

            for order in triggered {
                match self.attempt(&order) {
                    Ok(confirmation) => {
                        if let Some(mut done) = slot.remove(&order.id) {
                            done.status = OrderStatus::Executed;
                            executed.push(ExecutedOrder {
                                order: done,
                                confirmation,
                            });
                        }
                    }
                    Err(error) => failed.push(FailedExecution {
                        order_id: order.id,
                        error,
                    }),
                }
            }
            self.registry.forget(executed.iter().map(|e| &e.order.id));
            (executed, failed)
        });

        let Some((executed, failed)) = outcome else {
            return;
        };

        for e in &executed {
            Counters::bump(&self.counters.executed);
            tracing::info!(
                order = %e.order.id,
                product = %e.order.product_id,
                side = %e.order.side,
                amount = e.order.amount,
                limit = %e.order.limit_price,
                price = %price,
                execution = %e.confirmation.execution_id,
                "Order executed"
            );
        }
        for f in &failed {
            Counters::bump(&self.counters.execution_failures);
            tracing::warn!(
                order = %f.order_id,
                product = %product_id,
                price = %price,
                error = %f.error,
                "Execution failed; order kept pending for retry"
            );
        }

        report.executed = executed;
        report.failed = failed;
    }

    /// Send one execution instruction. A panicking client is reported as
    /// an unavailable venue; the slot lock does not poison.
    fn attempt(&self, order: &Order) -> std::result::Result<Confirmation, ExecutionError> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.client
                .execute(order.side, &order.product_id, order.amount)
        }))
        .unwrap_or_else(|payload| {
            Err(ExecutionError::Unavailable {
                reason: format!("execution client panicked: {}", panic_message(&*payload)),
            })
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn pending_order(&self, order_id: &OrderId) -> Option<Order> {
        self.registry.get(order_id)
    }

    #[must_use]
    pub fn pending_for(&self, product_id: &ProductId) -> Vec<Order> {
        self.registry.pending_for(product_id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn slot_policy(&self) -> SlotPolicy {
        self.registry.policy()
    }

    #[must_use]
    pub fn stats(&self) -> AgentStats {
        self.counters.snapshot()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}

impl PriceListener for LimitOrderAgent {
    fn on_price_tick(&self, product_id: &ProductId, price: Decimal) {
        let _ = self.process_tick(product_id, price);
    }
}

impl fmt::Debug for LimitOrderAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("LimitOrderAgent")
            .field("policy", &self.registry.policy())
            .field("pending", &self.registry.len())
            .field("rules", &rules)
            .finish_non_exhaustive()
    }
}
