//! Order board - reconciled kitchen and waiter queues
//!
//! Pure state, owned by the notification listener task. Every mutation goes
//! through this type so the dedup rules live in one place:
//!
//! - pending orders are unique by id (a repeated `nuevo_pedido` is a no-op)
//! - ready orders are unique by id (a repeated `pedido_terminado` is a no-op)
//! - a delivered update removes exactly that id from the ready list
//!
//! Both lists keep the newest entry first.

use shared::models::TableState;
use shared::{Order, OrderId, OrderState};
use std::collections::BTreeMap;

/// Detail of a pending order
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// Fetch in flight
    Loading,
    Resolved(Order),
    /// Fetch failed; the id stays on the board
    Failed(String),
}

/// Entry in the pending (kitchen) list
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub order_id: OrderId,
    pub detail: Detail,
}

impl PendingEntry {
    pub fn is_loading(&self) -> bool {
        matches!(self.detail, Detail::Loading)
    }

    pub fn order(&self) -> Option<&Order> {
        match &self.detail {
            Detail::Resolved(order) => Some(order),
            _ => None,
        }
    }
}

/// Outcome of a state update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    /// Order left the ready list
    Delivered,
    /// Pending entry moved forward
    Advanced,
    /// Backward or repeated state, ignored
    Ignored,
    /// Id not on the board
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    pending: Vec<PendingEntry>,
    ready: Vec<Order>,
    tables: BTreeMap<i64, TableState>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[PendingEntry] {
        &self.pending
    }

    pub fn ready(&self) -> &[Order] {
        &self.ready
    }

    pub fn tables(&self) -> &BTreeMap<i64, TableState> {
        &self.tables
    }

    pub fn pending_ids(&self) -> Vec<&OrderId> {
        self.pending.iter().map(|e| &e.order_id).collect()
    }

    pub fn ready_ids(&self) -> Vec<&OrderId> {
        self.ready.iter().map(|o| &o.id).collect()
    }

    pub fn contains_pending(&self, id: &OrderId) -> bool {
        self.pending.iter().any(|e| &e.order_id == id)
    }

    pub fn contains_ready(&self, id: &OrderId) -> bool {
        self.ready.iter().any(|o| &o.id == id)
    }

    /// Prepend a loading placeholder. Returns false if the id is already
    /// pending (no fetch needed).
    pub fn on_new_order(&mut self, id: OrderId) -> bool {
        if self.contains_pending(&id) {
            return false;
        }
        self.pending.insert(
            0,
            PendingEntry {
                order_id: id,
                detail: Detail::Loading,
            },
        );
        true
    }

    /// Replace the placeholder with the fetched order.
    ///
    /// An order that is already terminated or delivered does not belong in
    /// the kitchen queue any more and is dropped instead.
    pub fn resolve_pending(&mut self, order: Order) -> bool {
        let Some(idx) = self.pending.iter().position(|e| e.order_id == order.id) else {
            return false;
        };
        if order.state >= OrderState::Terminated {
            self.pending.remove(idx);
        } else {
            self.pending[idx].detail = Detail::Resolved(order);
        }
        true
    }

    pub fn fail_pending(&mut self, id: &OrderId, reason: impl Into<String>) -> bool {
        match self.pending.iter_mut().find(|e| &e.order_id == id) {
            Some(entry) if entry.is_loading() => {
                entry.detail = Detail::Failed(reason.into());
                true
            }
            _ => false,
        }
    }

    /// Prepend a terminated order to the ready list and drop it from the
    /// pending list. Returns false if the id is already ready or the order
    /// was delivered meanwhile.
    pub fn insert_ready(&mut self, order: Order) -> bool {
        if order.state >= OrderState::Delivered || self.contains_ready(&order.id) {
            return false;
        }
        self.pending.retain(|e| e.order_id != order.id);
        self.ready.insert(0, order);
        true
    }

    /// Apply a `pedido_actualizado` state
    pub fn on_state_update(&mut self, id: &OrderId, state: OrderState) -> StateUpdate {
        if state == OrderState::Delivered {
            let before = self.ready.len();
            self.ready.retain(|o| &o.id != id);
            let removed_pending = {
                let n = self.pending.len();
                self.pending.retain(|e| &e.order_id != id);
                n != self.pending.len()
            };
            return if before != self.ready.len() || removed_pending {
                StateUpdate::Delivered
            } else {
                StateUpdate::Unknown
            };
        }

        if let Some(order) = self.ready.iter_mut().find(|o| &o.id == id) {
            return advance(order, state);
        }

        match self.pending.iter_mut().find(|e| &e.order_id == id) {
            Some(PendingEntry {
                detail: Detail::Resolved(order),
                ..
            }) => advance(order, state),
            // Placeholder: the fetch will bring the current state
            Some(_) => StateUpdate::Ignored,
            None => StateUpdate::Unknown,
        }
    }

    /// Record a table's new state. Returns true if it changed.
    pub fn on_table_update(&mut self, table_id: i64, state: TableState) -> bool {
        self.tables.insert(table_id, state) != Some(state)
    }
}

fn advance(order: &mut Order, state: OrderState) -> StateUpdate {
    match order.state.advance(state) {
        Ok(next) => {
            order.state = next;
            order.timestamps.set(next, chrono::Utc::now());
            StateUpdate::Advanced
        }
        Err(e) => {
            tracing::warn!(order_id = %order.id, "Ignoring state update: {e}");
            StateUpdate::Ignored
        }
    }
}
