//! Auto-order rules: policies that may propose a new order on any tick.
//!
//! Rules run before the generic match step. They only propose; the agent
//! registers the proposal through the same validation path as an operator
//! call, so a rule can never bypass order checks.

use rust_decimal::Decimal;
use tickmatch_types::{NewOrder, OrderSide, ProductId, RuleConfig, ThresholdCross};

/// A policy evaluated on every tick.
pub trait AutoOrderRule: Send + Sync {
    /// Stable name used in logs and as the order source.
    fn name(&self) -> &str;

    /// Propose an order for this tick, if any.
    fn evaluate(&self, product_id: &ProductId, price: Decimal) -> Option<NewOrder>;
}

/// Fires when a product's price strictly crosses a fixed threshold.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    pub name: String,
    pub product_id: ProductId,
    pub cross: ThresholdCross,
    pub threshold: Decimal,
    pub side: OrderSide,
    pub amount: u64,
    pub limit_price: Decimal,
}

impl ThresholdRule {
    /// Buy `amount` at `limit` whenever `product_id` trades below `threshold`.
    #[must_use]
    pub fn dip_buy(
        product_id: impl Into<ProductId>,
        threshold: Decimal,
        amount: u64,
        limit: Decimal,
    ) -> Self {
        let product_id = product_id.into();
        Self {
            name: format!("{product_id}-dip-buy"),
            product_id,
            cross: ThresholdCross::Below,
            threshold,
            side: OrderSide::Buy,
            amount,
            limit_price: limit,
        }
    }

    /// Sell `amount` at `limit` whenever `product_id` trades above `threshold`.
    #[must_use]
    pub fn spike_sell(
        product_id: impl Into<ProductId>,
        threshold: Decimal,
        amount: u64,
        limit: Decimal,
    ) -> Self {
        let product_id = product_id.into();
        Self {
            name: format!("{product_id}-spike-sell"),
            product_id,
            cross: ThresholdCross::Above,
            threshold,
            side: OrderSide::Sell,
            amount,
            limit_price: limit,
        }
    }
}

impl AutoOrderRule for ThresholdRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, product_id: &ProductId, price: Decimal) -> Option<NewOrder> {
        if *product_id != self.product_id || !self.cross.is_crossed(price, self.threshold) {
            return None;
        }
        Some(NewOrder::new(
            self.side,
            self.product_id.clone(),
            self.amount,
            Some(self.limit_price),
        ))
    }
}

impl From<&RuleConfig> for ThresholdRule {
    fn from(cfg: &RuleConfig) -> Self {
        match cfg {
            RuleConfig::Threshold {
                name,
                product_id,
                cross,
                threshold,
                side,
                amount,
                limit_price,
            } => Self {
                name: name.clone(),
                product_id: product_id.clone(),
                cross: *cross,
                threshold: *threshold,
                side: *side,
                amount: *amount,
                limit_price: *limit_price,
            },
        }
    }
}

/// Instantiate configured rules, preserving their order.
pub fn build_rules(configs: &[RuleConfig]) -> Vec<Box<dyn AutoOrderRule>> {
    configs
        .iter()
        .map(|cfg| match cfg {
            RuleConfig::Threshold { .. } => {
                Box::new(ThresholdRule::from(cfg)) as Box<dyn AutoOrderRule>
            }
        })
        .collect()
}
