//! Configuration types for the limit order agent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, OrderSide, ProductId, Result, TickmatchError};

/// How many pending orders a product may hold, and what a new
/// registration does when the product already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SlotPolicy {
    /// One pending order per product; a new registration replaces it.
    #[default]
    Replace,
    /// FIFO queue per product. Every triggered order fires, oldest first.
    Queue { max_per_product: usize },
}

impl SlotPolicy {
    /// Maximum resident orders per product.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            Self::Replace => constants::SINGLE_SLOT_CAPACITY,
            Self::Queue { max_per_product } => *max_per_product,
        }
    }

    #[must_use]
    pub fn queued() -> Self {
        Self::Queue {
            max_per_product: constants::DEFAULT_MAX_ORDERS_PER_PRODUCT,
        }
    }
}

/// Direction a price has to cross a threshold for a rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdCross {
    /// `price < threshold`.
    Below,
    /// `price > threshold`.
    Above,
}

impl ThresholdCross {
    #[must_use]
    pub fn is_crossed(self, price: Decimal, threshold: Decimal) -> bool {
        match self {
            Self::Below => price < threshold,
            Self::Above => price > threshold,
        }
    }
}

/// Declarative auto-order rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    Threshold {
        name: String,
        product_id: ProductId,
        cross: ThresholdCross,
        threshold: Decimal,
        side: OrderSide,
        amount: u64,
        limit_price: Decimal,
    },
}

impl RuleConfig {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Threshold { name, .. } => name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Threshold {
                name,
                product_id,
                threshold,
                amount,
                limit_price,
                ..
            } => {
                if name.trim().is_empty() {
                    return Err(TickmatchError::Configuration(
                        "rule name must not be empty".to_string(),
                    ));
                }
                if product_id.is_empty() {
                    return Err(TickmatchError::Configuration(format!(
                        "rule {name}: product_id must not be empty"
                    )));
                }
                if *amount == 0 {
                    return Err(TickmatchError::Configuration(format!(
                        "rule {name}: amount must be positive"
                    )));
                }
                if threshold.is_sign_negative() && !threshold.is_zero() {
                    return Err(TickmatchError::Configuration(format!(
                        "rule {name}: threshold {threshold} is negative"
                    )));
                }
                if limit_price.is_sign_negative() && !limit_price.is_zero() {
                    return Err(TickmatchError::Configuration(format!(
                        "rule {name}: limit_price {limit_price} is negative"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub slot_policy: SlotPolicy,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl AgentConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_policy.capacity() == 0 {
            return Err(TickmatchError::Configuration(
                "max_per_product must be greater than zero".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &self.rules {
            rule.validate()?;
            if !seen.insert(rule.name()) {
                return Err(TickmatchError::Configuration(format!(
                    "duplicate rule name {}",
                    rule.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn dip_rule() -> RuleConfig {
        RuleConfig::Threshold {
            name: "ibm-dip".into(),
            product_id: ProductId::from("IBM"),
            cross: ThresholdCross::Below,
            threshold: dec!(100),
            side: OrderSide::Buy,
            amount: 1000,
            limit_price: dec!(100),
        }
    }

    #[test]
    fn default_config_is_single_slot() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.slot_policy, SlotPolicy::Replace);
        assert_eq!(cfg.slot_policy.capacity(), 1);
        assert!(cfg.rules.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_queue_policy_and_rules() {
        let json = r#"{
            "slot_policy": { "mode": "queue", "max_per_product": 3 },
            "rules": [{
                "kind": "threshold",
                "name": "ibm-dip",
                "product_id": "IBM",
                "cross": "below",
                "threshold": "100",
                "side": "Buy",
                "amount": 1000,
                "limit_price": "100"
            }]
        }"#;
        let cfg = AgentConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.slot_policy.capacity(), 3);
        assert_eq!(cfg.rules, vec![dip_rule()]);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AgentConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn zero_queue_capacity_rejected() {
        let cfg = AgentConfig {
            slot_policy: SlotPolicy::Queue { max_per_product: 0 },
            rules: vec![],
        };
        assert!(matches!(
            cfg.validate(),
            Err(TickmatchError::Configuration(_))
        ));
    }

    #[test]
    fn duplicate_rule_names_rejected() {
        let cfg = AgentConfig {
            slot_policy: SlotPolicy::Replace,
            rules: vec![dip_rule(), dip_rule()],
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_amount_rule_rejected() {
        let mut rule = dip_rule();
        if let RuleConfig::Threshold { amount, .. } = &mut rule {
            *amount = 0;
        }
        assert!(rule.validate().is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = AgentConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TickmatchError::Serialization(_)));
    }

    #[test]
    fn threshold_cross_is_strict() {
        assert!(ThresholdCross::Below.is_crossed(dec!(99.99), dec!(100)));
        assert!(!ThresholdCross::Below.is_crossed(dec!(100), dec!(100)));
        assert!(ThresholdCross::Above.is_crossed(dec!(100.01), dec!(100)));
        assert!(!ThresholdCross::Above.is_crossed(dec!(100), dec!(100)));
    }
}
