//! Price tick delivery.
//!
//! - [`PriceListener`]: the push callback a feed invokes once per tick
//! - [`PriceFeed`]: synchronous fan-out to registered listeners
//! - [`spawn_tick_pump`]: tokio task that drains a channel of [`PriceTick`]s
//!   into one listener, for feeds running on other tasks

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tickmatch_types::{constants, ProductId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Receiver of price ticks. Called synchronously; returns nothing.
pub trait PriceListener: Send + Sync {
    fn on_price_tick(&self, product_id: &ProductId, price: Decimal);
}

impl<T: PriceListener + ?Sized> PriceListener for Arc<T> {
    fn on_price_tick(&self, product_id: &ProductId, price: Decimal) {
        (**self).on_price_tick(product_id, price);
    }
}

/// A single observed price for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTick {
    pub product_id: ProductId,
    pub price: Decimal,
}

impl PriceTick {
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            price,
        }
    }
}

/// Fan-out point for ticks. Listeners are called in registration order.
#[derive(Default)]
pub struct PriceFeed {
    listeners: RwLock<Vec<Arc<dyn PriceListener>>>,
}

impl PriceFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_listener(&self, listener: Arc<dyn PriceListener>) {
        self.listeners.write().push(listener);
    }

    /// Deliver a tick to every listener.
    pub fn publish(&self, tick: &PriceTick) {
        // Snapshot so a listener may register another listener without deadlocking.
        let listeners: Vec<Arc<dyn PriceListener>> = self.listeners.read().clone();
        for listener in listeners {
            listener.on_price_tick(&tick.product_id, tick.price);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl std::fmt::Debug for PriceFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceFeed")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Bounded channel for [`spawn_tick_pump`], sized with the default depth.
#[must_use]
pub fn tick_channel() -> (mpsc::Sender<PriceTick>, mpsc::Receiver<PriceTick>) {
    mpsc::channel(constants::DEFAULT_TICK_CHANNEL_CAPACITY)
}

/// Deliver every tick from `rx` to `listener`, one at a time, in arrival
/// order. The task finishes when all senders are dropped and returns the
/// number of ticks delivered.
pub fn spawn_tick_pump(
    listener: Arc<dyn PriceListener>,
    mut rx: mpsc::Receiver<PriceTick>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut delivered = 0u64;
        while let Some(tick) = rx.recv().await {
            listener.on_price_tick(&tick.product_id, tick.price);
            delivered += 1;
        }
        tracing::debug!(delivered, "Tick pump drained");
        delivered
    })
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Default)]
    struct Collector {
        seen: Mutex<Vec<PriceTick>>,
    }

    impl PriceListener for Collector {
        fn on_price_tick(&self, product_id: &ProductId, price: Decimal) {
            self.seen.lock().push(PriceTick {
                product_id: product_id.clone(),
                price,
            });
        }
    }

    #[test]
    fn publish_reaches_every_listener() {
        let feed = PriceFeed::new();
        let a = Arc::new(Collector::default());
        let b = Arc::new(Collector::default());
        feed.register_listener(a.clone());
        feed.register_listener(b.clone());
        assert_eq!(feed.listener_count(), 2);

        feed.publish(&PriceTick::new("IBM", dec!(101)));
        assert_eq!(a.seen.lock().len(), 1);
        assert_eq!(b.seen.lock()[0], PriceTick::new("IBM", dec!(101)));
    }

    #[test]
    fn publish_without_listeners_is_noop() {
        let feed = PriceFeed::new();
        feed.publish(&PriceTick::new("ZZZ", dec!(50)));
        assert_eq!(feed.listener_count(), 0);
    }

    #[tokio::test]
    async fn pump_delivers_in_order_and_stops() {
        let collector = Arc::new(Collector::default());
        let (tx, rx) = tick_channel();
        let handle = spawn_tick_pump(collector.clone(), rx);

        for p in [dec!(3), dec!(2), dec!(1)] {
            tx.send(PriceTick::new("IBM", p)).await.unwrap();
        }
        drop(tx);

        assert_eq!(handle.await.unwrap(), 3);
        let prices: Vec<Decimal> = collector.seen.lock().iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![dec!(3), dec!(2), dec!(1)]);
    }
}
