//! Cart view synchronizer.
//!
//! Keeps the displayed rows and the displayed total consistent with the
//! outcome of remote mutations. Subtotals always come from the server; the
//! only local arithmetic is summing the subtotal cells into the total.
//!
//! ERROR HANDLING
//! ==============
//! - Shopper declines the confirmation: silent abort, no request.
//! - `success: false`: the server's message is shown, nothing changes.
//! - Transport/status/decode/timeout failure: a generic message is shown,
//!   nothing changes.
//! - Row not displayed: no-op, logged at debug.
//!
//! Nothing is retried. A row with a request in flight rejects further
//! mutations until that request settles.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::cell::RefCell;
use std::collections::HashSet;

use super::view::CartView;
use crate::config::Messages;
use crate::money::Money;
use crate::net::api::CartApi;
use crate::util::notify::Notifier;

/// How a cart operation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation succeeded and the view was patched.
    Applied,
    /// The last row was removed and the empty-cart reload was triggered.
    Emptied,
    /// The shopper declined the confirmation prompt.
    Declined,
    /// The server answered `success: false`.
    Rejected,
    /// No usable reply (transport, status, decode or timeout).
    Failed,
    /// No displayed row matches the id.
    RowMissing,
    /// A request for this row is still pending.
    Busy,
}

pub struct CartSynchronizer<V, A, N> {
    view: V,
    api: A,
    notifier: N,
    messages: Messages,
    in_flight: RefCell<HashSet<String>>,
}

/// Marks a row as in flight; releases it (and its controls) when dropped.
struct InFlight<'a, V: CartView> {
    id: String,
    set: &'a RefCell<HashSet<String>>,
    view: &'a V,
}

impl<V: CartView> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.id);
        self.view.set_row_busy(&self.id, false);
    }
}

impl<V: CartView, A: CartApi, N: Notifier> CartSynchronizer<V, A, N> {
    pub fn new(view: V, api: A, notifier: N, messages: Messages) -> Self {
        Self { view, api, notifier, messages, in_flight: RefCell::new(HashSet::new()) }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.borrow().contains(id)
    }

    /// Confirm, then delete the line item remotely and drop its row.
    ///
    /// Removing the last row reloads the page.
    pub async fn remove_item(&self, id: &str) -> Outcome {
        if let Some(outcome) = self.precheck(id) {
            return outcome;
        }
        if !self.notifier.confirm(&self.messages.confirm_remove) {
            log::debug!("removal of {id} declined");
            return Outcome::Declined;
        }

        let _guard = self.begin(id);
        match self.api.delete_item(id).await {
            Ok(reply) if reply.success => {
                if !self.view.remove_row(id) {
                    log::debug!("row {id} disappeared before removal was applied");
                }
                self.recompute_total();
                self.notifier.alert(&self.messages.item_removed);
                if self.view.row_count() == 0 {
                    log::info!("cart is empty; reloading");
                    self.view.reload();
                    return Outcome::Emptied;
                }
                Outcome::Applied
            }
            Ok(reply) => {
                log::warn!("server rejected removal of {id}: {}", reply.message_or_empty());
                self.notifier.alert(&self.messages.rejection(reply.message_or_empty()));
                Outcome::Rejected
            }
            Err(e) => {
                log::error!("removal of {id} failed: {e}");
                self.notifier.alert(&self.messages.remove_failed);
                Outcome::Failed
            }
        }
    }

    /// Send a new quantity and patch the row with the server's subtotal.
    ///
    /// `quantity` is passed through as-is; validation belongs to the caller
    /// and the server.
    pub async fn update_quantity(&self, id: &str, quantity: u32) -> Outcome {
        if let Some(outcome) = self.precheck(id) {
            return outcome;
        }

        let _guard = self.begin(id);
        match self.api.update_quantity(id, quantity).await {
            Ok(reply) if reply.success => {
                let Some(subtotal) = reply.subtotal.and_then(Money::from_f64) else {
                    log::error!("update of {id} succeeded without a usable subtotal: {:?}", reply.subtotal);
                    self.notifier.alert(&self.messages.update_failed);
                    return Outcome::Failed;
                };
                if !self.view.set_quantity(id, quantity) {
                    log::debug!("row {id} disappeared before update was applied");
                    return Outcome::RowMissing;
                }
                self.view.set_subtotal(id, &subtotal.to_string());
                self.recompute_total();
                Outcome::Applied
            }
            Ok(reply) => {
                log::warn!("server rejected quantity {quantity} for {id}: {}", reply.message_or_empty());
                self.notifier.alert(&self.messages.rejection(reply.message_or_empty()));
                Outcome::Rejected
            }
            Err(e) => {
                log::error!("quantity update of {id} failed: {e}");
                self.notifier.alert(&self.messages.update_failed);
                Outcome::Failed
            }
        }
    }

    /// Sum the displayed subtotals into the total cell.
    ///
    /// Unparsable cells count as zero (see [`Money::parse_or_zero`]).
    pub fn recompute_total(&self) -> Money {
        let total: Money = self
            .view
            .subtotal_texts()
            .iter()
            .map(|text| Money::parse_or_zero(text))
            .sum();
        self.view.set_total(&total.to_string());
        total
    }

    fn precheck(&self, id: &str) -> Option<Outcome> {
        if id.is_empty() || !self.view.has_row(id) {
            log::debug!("no cart row for id {id:?}");
            return Some(Outcome::RowMissing);
        }
        if self.is_in_flight(id) {
            log::debug!("request for {id} already pending");
            return Some(Outcome::Busy);
        }
        None
    }

    fn begin(&self, id: &str) -> InFlight<'_, V> {
        self.in_flight.borrow_mut().insert(id.to_owned());
        self.view.set_row_busy(id, true);
        InFlight { id: id.to_owned(), set: &self.in_flight, view: &self.view }
    }
}
