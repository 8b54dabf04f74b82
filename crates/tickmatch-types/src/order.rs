//! Order types for the tickmatch limit order agent.
//!
//! A [`NewOrder`] is what callers (operators or auto-order rules) submit.
//! It becomes an [`Order`] only after validation; an order resident in the
//! registry is always [`OrderStatus::Pending`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, ProductId, Result, TickmatchError};

/// Direction of a conditional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an order.
///
/// `Pending → Executed` and `Pending → Cancelled` are the only transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Executed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Executed => write!(f, "EXECUTED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSource {
    /// Direct registration call.
    Operator,
    /// Proposed by the named auto-order rule.
    Rule(String),
}

impl std::fmt::Display for OrderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator => write!(f, "operator"),
            Self::Rule(name) => write!(f, "rule:{name}"),
        }
    }
}

/// An unvalidated registration request.
///
/// `limit_price` is optional so that a request with no limit can be
/// represented (and rejected) rather than silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub side: OrderSide,
    pub product_id: ProductId,
    pub amount: u64,
    #[serde(default)]
    pub limit_price: Option<Decimal>,
}

impl NewOrder {
    #[must_use]
    pub fn new(
        side: OrderSide,
        product_id: impl Into<ProductId>,
        amount: u64,
        limit_price: Option<Decimal>,
    ) -> Self {
        Self {
            side,
            product_id: product_id.into(),
            amount,
            limit_price,
        }
    }

    /// Buy `amount` of `product_id` once the price is at or below `limit`.
    #[must_use]
    pub fn buy(product_id: impl Into<ProductId>, amount: u64, limit: Decimal) -> Self {
        Self::new(OrderSide::Buy, product_id, amount, Some(limit))
    }

    /// Sell `amount` of `product_id` once the price is at or above `limit`.
    #[must_use]
    pub fn sell(product_id: impl Into<ProductId>, amount: u64, limit: Decimal) -> Self {
        Self::new(OrderSide::Sell, product_id, amount, Some(limit))
    }

    /// Check the request and return its limit price.
    pub fn validate(&self) -> Result<Decimal> {
        if self.product_id.is_empty() {
            return Err(TickmatchError::InvalidOrder {
                reason: "Product id must not be empty".to_string(),
            });
        }
        if self.amount == 0 {
            return Err(TickmatchError::InvalidOrder {
                reason: "Amount must be positive".to_string(),
            });
        }
        let limit = self.limit_price.ok_or_else(|| TickmatchError::InvalidOrder {
            reason: "Limit price is required".to_string(),
        })?;
        if limit.is_sign_negative() && !limit.is_zero() {
            return Err(TickmatchError::InvalidOrder {
                reason: format!("Limit price {limit} must not be negative"),
            });
        }
        Ok(limit)
    }
}

/// A validated conditional order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub product_id: ProductId,
    pub amount: u64,
    pub limit_price: Decimal,
    pub status: OrderStatus,
    pub source: OrderSource,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Validate a request and build a pending order from it.
    pub fn from_request(request: NewOrder, source: OrderSource) -> Result<Self> {
        let limit_price = request.validate()?;
        Ok(Self {
            id: OrderId::new(),
            side: request.side,
            product_id: request.product_id,
            amount: request.amount,
            limit_price,
            status: OrderStatus::Pending,
            source,
            created_at: Utc::now(),
        })
    }

    /// Whether a tick at `price` satisfies this order's limit.
    ///
    /// Both sides are boundary inclusive: a buy fires at `price <= limit`,
    /// a sell at `price >= limit`.
    #[must_use]
    pub fn is_triggered_by(&self, price: Decimal) -> bool {
        match self.side {
            OrderSide::Buy => price <= self.limit_price,
            OrderSide::Sell => price >= self.limit_price,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order[{}] {} {} {} @ {} ({})",
            self.id, self.side, self.amount, self.product_id, self.limit_price, self.status,
        )
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy_limit(side: OrderSide, product: &str, amount: u64, limit: Decimal) -> Self {
        Self {
            id: OrderId::new(),
            side,
            product_id: ProductId::from(product),
            amount,
            limit_price: limit,
            status: OrderStatus::Pending,
            source: OrderSource::Operator,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn order_side_display() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
    }

    #[test]
    fn buy_triggers_at_or_below_limit() {
        let order = Order::dummy_limit(OrderSide::Buy, "IBM", 1000, dec!(100.00));
        assert!(order.is_triggered_by(dec!(100)));
        assert!(order.is_triggered_by(dec!(99.99)));
        assert!(!order.is_triggered_by(dec!(100.01)));
    }

    #[test]
    fn sell_triggers_at_or_above_limit() {
        let order = Order::dummy_limit(OrderSide::Sell, "IBM", 10, dec!(50.5));
        assert!(order.is_triggered_by(dec!(50.50)));
        assert!(order.is_triggered_by(dec!(51)));
        assert!(!order.is_triggered_by(dec!(50.49)));
    }

    #[test]
    fn equality_ignores_scale() {
        // 100 and 100.000 are the same price.
        let order = Order::dummy_limit(OrderSide::Buy, "IBM", 1, dec!(100));
        assert!(order.is_triggered_by(dec!(100.000)));
    }

    #[test]
    fn zero_amount_rejected() {
        let err = NewOrder::buy("X", 0, dec!(10.0)).validate().unwrap_err();
        assert!(matches!(err, TickmatchError::InvalidOrder { .. }));
    }

    #[test]
    fn missing_limit_rejected() {
        let err = NewOrder::new(OrderSide::Buy, "X", 5, None)
            .validate()
            .unwrap_err();
        assert!(matches!(err, TickmatchError::InvalidOrder { .. }));
    }

    #[test]
    fn negative_limit_rejected() {
        let err = NewOrder::sell("X", 5, dec!(-0.01)).validate().unwrap_err();
        assert!(matches!(err, TickmatchError::InvalidOrder { .. }));
    }

    #[test]
    fn zero_limit_accepted() {
        assert_eq!(NewOrder::sell("X", 5, dec!(0)).validate().unwrap(), dec!(0));
    }

    #[test]
    fn blank_product_rejected() {
        let err = NewOrder::buy("  ", 5, dec!(1)).validate().unwrap_err();
        assert!(matches!(err, TickmatchError::InvalidOrder { .. }));
    }

    #[test]
    fn from_request_builds_pending_order() {
        let order =
            Order::from_request(NewOrder::buy("IBM", 1000, dec!(100)), OrderSource::Operator)
                .unwrap();
        assert!(order.is_pending());
        assert_eq!(order.product_id.as_str(), "IBM");
        assert_eq!(order.amount, 1000);
        assert_eq!(order.limit_price, dec!(100));
    }

    #[test]
    fn request_deserializes_without_limit() {
        let req: NewOrder =
            serde_json::from_str(r#"{"side":"Buy","product_id":"X","amount":5}"#).unwrap();
        assert_eq!(req.limit_price, None);
        assert!(req.validate().is_err());
    }

    #[test]
    fn status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Executed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn source_display() {
        assert_eq!(OrderSource::Operator.to_string(), "operator");
        assert_eq!(OrderSource::Rule("dip".into()).to_string(), "rule:dip");
    }
}
