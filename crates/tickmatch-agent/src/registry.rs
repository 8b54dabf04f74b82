//! Pending order registry, sharded by product.
//!
//! Layout:
//! - `slots`: `RwLock<HashMap<ProductId, Arc<Mutex<ProductSlot>>>>`. The outer
//!   lock is held only long enough to find or create a slot.
//! - each [`ProductSlot`] has its own mutex, so ticks for unrelated products
//!   never wait on each other.
//! - `index`: `OrderId -> ProductId` for cancellation. Lock order is always
//!   slot, then index; the index lock is never held while acquiring a slot.
//!
//! Slots are never removed from the map. A slot handle cloned out of the map
//! therefore always refers to the live slot for that product.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tickmatch_types::{Order, OrderId, ProductId, Result, SlotPolicy, TickmatchError};

/// Pending orders for a single product, oldest first.
#[derive(Debug, Default)]
pub struct ProductSlot {
    orders: VecDeque<Order>,
}

impl ProductSlot {
    /// Orders whose limit is satisfied by `price`, in registration order.
    pub fn triggered_by(&self, price: Decimal) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.is_triggered_by(price))
    }

    /// Remove an order by ID.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == *order_id)?;
        self.orders.remove(pos)
    }

    #[must_use]
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == *order_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

/// Per-product store of pending conditional orders.
#[derive(Debug)]
pub struct OrderRegistry {
    policy: SlotPolicy,
    slots: RwLock<HashMap<ProductId, Arc<Mutex<ProductSlot>>>>,
    index: Mutex<HashMap<OrderId, ProductId>>,
}

impl OrderRegistry {
    #[must_use]
    pub fn new(policy: SlotPolicy) -> Self {
        Self {
            policy,
            slots: RwLock::new(HashMap::new()),
            index: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> SlotPolicy {
        self.policy
    }

    // =================================================================
    // Insertion
    // =================================================================

    /// Insert a pending order.
    ///
    /// Under [`SlotPolicy::Replace`] an existing order for the product is
    /// evicted and returned. Under [`SlotPolicy::Queue`] the order is
    /// appended, or rejected once the product is at capacity.
    pub fn insert(&self, order: Order) -> Result<Option<Order>> {
        let slot = self.slot_or_create(&order.product_id);
        let order_id = order.id;
        let product_id = order.product_id.clone();

        let mut slot = slot.lock();
        let replaced = match self.policy {
            SlotPolicy::Replace => {
                let previous = slot.orders.pop_front();
                slot.orders.clear();
                slot.orders.push_back(order);
                previous
            }
            SlotPolicy::Queue { max_per_product } => {
                if slot.orders.len() >= max_per_product {
                    return Err(TickmatchError::OrderLimitExceeded {
                        product: product_id,
                        max: max_per_product,
                    });
                }
                slot.orders.push_back(order);
                None
            }
        };

        // Still under the slot lock: a racing tick cannot forget this ID
        // before it is indexed.
        let mut index = self.index.lock();
        if let Some(prev) = &replaced {
            index.remove(&prev.id);
        }
        index.insert(order_id, product_id);
        Ok(replaced)
    }

    // =================================================================
    // Removal
    // =================================================================

    /// Remove a pending order by ID, wherever it lives.
    pub fn remove(&self, order_id: &OrderId) -> Result<Order> {
        let product_id = self
            .index
            .lock()
            .get(order_id)
            .cloned()
            .ok_or(TickmatchError::OrderNotFound(*order_id))?;

        self.with_slot(&product_id, |slot| {
            let order = slot.remove(order_id)?;
            self.index.lock().remove(order_id);
            Some(order)
        })
        .flatten()
        .ok_or(TickmatchError::OrderNotFound(*order_id))
    }

    /// Drop index entries for orders already taken out of their slot.
    ///
    /// Call while still holding that slot (inside [`Self::with_slot`]).
    pub fn forget<'a>(&self, order_ids: impl IntoIterator<Item = &'a OrderId>) {
        let mut index = self.index.lock();
        for id in order_ids {
            index.remove(id);
        }
    }

    // =================================================================
    // Slot access
    // =================================================================

    /// Run `f` with exclusive access to the product's slot.
    ///
    /// Returns `None` without creating anything when the product has never
    /// held an order. Only this product's lock is held while `f` runs.
    pub fn with_slot<R>(
        &self,
        product_id: &ProductId,
        f: impl FnOnce(&mut ProductSlot) -> R,
    ) -> Option<R> {
        let slot = self.slots.read().get(product_id).cloned()?;
        let mut guard = slot.lock();
        Some(f(&mut guard))
    }

    fn slot_or_create(&self, product_id: &ProductId) -> Arc<Mutex<ProductSlot>> {
        if let Some(slot) = self.slots.read().get(product_id) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(
            slots
                .entry(product_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(ProductSlot::default()))),
        )
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Snapshot of a pending order.
    #[must_use]
    pub fn get(&self, order_id: &OrderId) -> Option<Order> {
        let product_id = self.index.lock().get(order_id).cloned()?;
        self.with_slot(&product_id, |slot| slot.get(order_id).cloned())
            .flatten()
    }

    /// Snapshot of a product's pending orders, oldest first.
    #[must_use]
    pub fn pending_for(&self, product_id: &ProductId) -> Vec<Order> {
        self.with_slot(product_id, |slot| slot.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Total pending orders across all products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.lock().contains_key(order_id)
    }
}

impl Default for OrderRegistry {
    fn default() -> Self {
        Self::new(SlotPolicy::default())
    }
}
