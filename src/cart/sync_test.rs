use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;

use super::*;
use crate::error::CartError;
use crate::net::types::{ApiReply, UpdateReply};

// =============================================================
// Fakes
// =============================================================

#[derive(Clone, Debug)]
struct Row {
    id: String,
    quantity: String,
    unit_price: Money,
    subtotal: String,
    busy: bool,
}

#[derive(Default)]
struct FakeView {
    rows: RefCell<Vec<Row>>,
    total: RefCell<String>,
    reloads: Cell<usize>,
    busy_changes: RefCell<Vec<(String, bool)>>,
}

impl FakeView {
    fn with_rows(rows: &[(&str, u32, &str)]) -> Self {
        let view = Self::default();
        for (id, quantity, subtotal) in rows {
            let subtotal_money = Money::parse_or_zero(subtotal);
            view.rows.borrow_mut().push(Row {
                id: (*id).to_owned(),
                quantity: quantity.to_string(),
                unit_price: Money::from_cents(subtotal_money.cents() / i64::from(*quantity)),
                subtotal: (*subtotal).to_owned(),
                busy: false,
            });
        }
        view
    }

    fn row(&self, id: &str) -> Option<Row> {
        self.rows.borrow().iter().find(|r| r.id == id).cloned()
    }

    fn total(&self) -> String {
        self.total.borrow().clone()
    }

    fn ids(&self) -> Vec<String> {
        self.rows.borrow().iter().map(|r| r.id.clone()).collect()
    }
}

impl CartView for FakeView {
    fn has_row(&self, id: &str) -> bool {
        self.row(id).is_some()
    }

    fn remove_row(&self, id: &str) -> bool {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        rows.len() != before
    }

    fn set_quantity(&self, id: &str, quantity: u32) -> bool {
        match self.rows.borrow_mut().iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.quantity = quantity.to_string();
                true
            }
            None => false,
        }
    }

    fn set_subtotal(&self, id: &str, text: &str) -> bool {
        match self.rows.borrow_mut().iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.subtotal = text.to_owned();
                true
            }
            None => false,
        }
    }

    fn subtotal_texts(&self) -> Vec<String> {
        self.rows.borrow().iter().map(|r| r.subtotal.clone()).collect()
    }

    fn set_total(&self, text: &str) {
        *self.total.borrow_mut() = text.to_owned();
    }

    fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    fn set_row_busy(&self, id: &str, busy: bool) {
        self.busy_changes.borrow_mut().push((id.to_owned(), busy));
        if let Some(row) = self.rows.borrow_mut().iter_mut().find(|r| r.id == id) {
            row.busy = busy;
        }
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

type Reply<T> = oneshot::Receiver<Result<T, CartError>>;

#[derive(Default)]
struct FakeApi {
    deletes: RefCell<VecDeque<Reply<ApiReply>>>,
    updates: RefCell<VecDeque<Reply<UpdateReply>>>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    fn push_delete(&self, result: Result<ApiReply, CartError>) {
        let (tx, rx) = oneshot::channel();
        tx.send(result).unwrap();
        self.deletes.borrow_mut().push_back(rx);
    }

    fn push_delete_pending(&self) -> oneshot::Sender<Result<ApiReply, CartError>> {
        let (tx, rx) = oneshot::channel();
        self.deletes.borrow_mut().push_back(rx);
        tx
    }

    fn push_update(&self, result: Result<UpdateReply, CartError>) {
        let (tx, rx) = oneshot::channel();
        tx.send(result).unwrap();
        self.updates.borrow_mut().push_back(rx);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

async fn settle<T>(reply: Option<Reply<T>>) -> Result<T, CartError> {
    match reply {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(CartError::Transport("reply dropped".to_owned()))),
        None => Err(CartError::Transport("no scripted reply".to_owned())),
    }
}

impl CartApi for FakeApi {
    async fn delete_item(&self, id: &str) -> Result<ApiReply, CartError> {
        self.calls.borrow_mut().push(format!("delete {id}"));
        let reply = self.deletes.borrow_mut().pop_front();
        settle(reply).await
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> Result<UpdateReply, CartError> {
        self.calls.borrow_mut().push(format!("update {id} {quantity}"));
        let reply = self.updates.borrow_mut().pop_front();
        settle(reply).await
    }
}

struct FakeNotifier {
    answer: Cell<bool>,
    confirms: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl Default for FakeNotifier {
    fn default() -> Self {
        Self { answer: Cell::new(true), confirms: RefCell::default(), alerts: RefCell::default() }
    }
}

impl FakeNotifier {
    fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for FakeNotifier {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_owned());
        self.answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

type TestCart = CartSynchronizer<FakeView, FakeApi, FakeNotifier>;

fn cart(rows: &[(&str, u32, &str)]) -> TestCart {
    let sync = CartSynchronizer::new(
        FakeView::with_rows(rows),
        FakeApi::default(),
        FakeNotifier::default(),
        Messages::default(),
    );
    sync.recompute_total();
    sync
}

fn ok() -> Result<ApiReply, CartError> {
    Ok(ApiReply { success: true, message: None })
}

fn rejected(message: &str) -> Result<ApiReply, CartError> {
    Ok(ApiReply { success: false, message: Some(message.to_owned()) })
}

// =============================================================
// recompute_total
// =============================================================

#[test]
fn recompute_total_sums_displayed_subtotals() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 2, "$20.00")]);
    assert_eq!(sync.recompute_total(), Money::from_cents(3000));
    assert_eq!(sync.view().total(), "$30.00");
}

#[test]
fn recompute_total_is_idempotent() {
    let sync = cart(&[("a", 1, "$0.10"), ("b", 1, "$0.20"), ("c", 3, "$1,000.05")]);
    let first = sync.recompute_total();
    let shown = sync.view().total();
    assert_eq!(sync.recompute_total(), first);
    assert_eq!(sync.view().total(), shown);
    assert_eq!(shown, "$1000.35");
}

#[test]
fn recompute_total_counts_malformed_cells_as_zero() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "consultar"), ("c", 1, "$5.50")]);
    assert_eq!(sync.recompute_total(), Money::from_cents(1550));
    assert_eq!(sync.view().total(), "$15.50");
}

#[test]
fn recompute_total_of_empty_table_is_zero() {
    let sync = cart(&[]);
    assert_eq!(sync.recompute_total(), Money::ZERO);
    assert_eq!(sync.view().total(), "$0.00");
}

// =============================================================
// remove_item
// =============================================================

#[test]
fn remove_item_success_drops_row_and_updates_total() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    sync.api().push_delete(ok());

    let outcome = block_on(sync.remove_item("a"));

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(sync.view().ids(), vec!["b".to_owned()]);
    assert_eq!(sync.view().total(), "$20.00");
    assert_eq!(sync.api().calls(), vec!["delete a".to_owned()]);
    assert_eq!(sync.notifier().alerts(), vec![Messages::default().item_removed]);
    assert_eq!(sync.view().reloads.get(), 0);
}

#[test]
fn remove_item_asks_for_confirmation_first() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    sync.api().push_delete(ok());
    block_on(sync.remove_item("a"));
    assert_eq!(sync.notifier().confirms.borrow().as_slice(), [Messages::default().confirm_remove]);
}

#[test]
fn remove_last_row_triggers_reload() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.api().push_delete(ok());

    let outcome = block_on(sync.remove_item("b"));

    assert_eq!(outcome, Outcome::Emptied);
    assert_eq!(sync.view().row_count(), 0);
    assert_eq!(sync.view().total(), "$0.00");
    assert_eq!(sync.view().reloads.get(), 1);
}

#[test]
fn sequential_removals_keep_total_equal_to_remaining_rows() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 2, "$20.00"), ("c", 1, "$7.25"), ("d", 4, "$0.99")]);
    for id in ["c", "a", "d"] {
        sync.api().push_delete(ok());
        assert_eq!(block_on(sync.remove_item(id)), Outcome::Applied);
        let expected: Money = sync.view().subtotal_texts().iter().map(|t| Money::parse_or_zero(t)).sum();
        assert_eq!(sync.view().total(), expected.to_string());
    }
    assert_eq!(sync.view().total(), "$20.00");
}

#[test]
fn remove_item_declined_sends_nothing() {
    let sync = cart(&[("a", 1, "$10.00")]);
    sync.notifier().answer.set(false);

    let outcome = block_on(sync.remove_item("a"));

    assert_eq!(outcome, Outcome::Declined);
    assert!(sync.api().calls().is_empty());
    assert!(sync.notifier().alerts().is_empty());
    assert!(sync.view().has_row("a"));
    assert!(sync.view().busy_changes.borrow().is_empty());
}

#[test]
fn remove_item_rejection_shows_server_message_and_keeps_row() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    sync.api().push_delete(rejected("Item no encontrado"));

    let outcome = block_on(sync.remove_item("a"));

    assert_eq!(outcome, Outcome::Rejected);
    assert!(sync.view().has_row("a"));
    assert_eq!(sync.view().total(), "$30.00");
    assert_eq!(sync.notifier().alerts(), vec!["Error: Item no encontrado".to_owned()]);
}

#[test]
fn remove_item_status_failure_shows_generic_message_and_keeps_row() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    sync.api().push_delete(Err(CartError::Status(500)));

    let outcome = block_on(sync.remove_item("a"));

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(sync.view().ids(), vec!["a".to_owned(), "b".to_owned()]);
    assert_eq!(sync.view().total(), "$30.00");
    assert_eq!(sync.notifier().alerts(), vec![Messages::default().remove_failed]);
}

#[test]
fn remove_item_timeout_is_a_generic_failure() {
    let sync = cart(&[("a", 1, "$10.00")]);
    sync.api().push_delete(Err(CartError::Timeout { ms: 10_000 }));
    assert_eq!(block_on(sync.remove_item("a")), Outcome::Failed);
    assert!(sync.view().has_row("a"));
    assert!(!sync.is_in_flight("a"));
}

#[test]
fn remove_item_unknown_or_empty_id_is_noop() {
    let sync = cart(&[("a", 1, "$10.00")]);
    assert_eq!(block_on(sync.remove_item("zzz")), Outcome::RowMissing);
    assert_eq!(block_on(sync.remove_item("")), Outcome::RowMissing);
    assert!(sync.notifier().confirms.borrow().is_empty());
    assert!(sync.notifier().alerts().is_empty());
    assert!(sync.api().calls().is_empty());
}

#[test]
fn remove_item_rejects_duplicate_click_while_pending() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    let reply = sync.api().push_delete_pending();

    let mut first = Box::pin(sync.remove_item("a"));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(sync.is_in_flight("a"));
    assert!(sync.view().row("a").is_some_and(|r| r.busy));

    assert_eq!(block_on(sync.remove_item("a")), Outcome::Busy);
    assert_eq!(sync.api().calls(), vec!["delete a".to_owned()]);

    reply.send(ok()).unwrap();
    assert_eq!(block_on(first), Outcome::Applied);
    assert!(!sync.is_in_flight("a"));
    assert_eq!(sync.view().total(), "$20.00");
}

#[test]
fn other_rows_stay_usable_while_one_is_pending() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00"), ("c", 1, "$5.00")]);
    let reply = sync.api().push_delete_pending();
    let mut first = Box::pin(sync.remove_item("a"));
    assert!(first.as_mut().now_or_never().is_none());

    sync.api().push_delete(ok());
    assert_eq!(block_on(sync.remove_item("b")), Outcome::Applied);

    reply.send(ok()).unwrap();
    assert_eq!(block_on(first), Outcome::Applied);
    assert_eq!(sync.view().ids(), vec!["c".to_owned()]);
    assert_eq!(sync.view().total(), "$5.00");
}

#[test]
fn failed_request_releases_row_controls() {
    let sync = cart(&[("a", 1, "$10.00")]);
    sync.api().push_delete(Err(CartError::Transport("offline".to_owned())));
    block_on(sync.remove_item("a"));
    assert_eq!(
        sync.view().busy_changes.borrow().as_slice(),
        [("a".to_owned(), true), ("a".to_owned(), false)]
    );
    assert!(sync.view().row("a").is_some_and(|r| !r.busy));
}

// =============================================================
// update_quantity
// =============================================================

#[test]
fn update_quantity_uses_server_subtotal() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.api().push_update(Ok(UpdateReply { success: true, message: None, subtotal: Some(60.0) }));

    let outcome = block_on(sync.update_quantity("b", 3));

    assert_eq!(outcome, Outcome::Applied);
    let row = sync.view().row("b").unwrap();
    assert_eq!(row.quantity, "3");
    assert_eq!(row.subtotal, "$60.00");
    assert_eq!(sync.view().total(), "$60.00");
    assert_eq!(sync.api().calls(), vec!["update b 3".to_owned()]);
    assert!(sync.notifier().alerts().is_empty());
}

#[test]
fn update_quantity_trusts_server_over_local_arithmetic() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    sync.api().push_update(Ok(UpdateReply { success: true, message: None, subtotal: Some(55.5) }));

    assert_eq!(block_on(sync.update_quantity("b", 3)), Outcome::Applied);

    let row = sync.view().row("b").unwrap();
    let local = Money::from_cents(row.unit_price.cents() * 3);
    assert_eq!(local.to_string(), "$60.00");
    assert_eq!(row.subtotal, "$55.50");
    assert_eq!(sync.view().total(), "$65.50");
}

#[test]
fn update_quantity_rejection_leaves_row_untouched() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.api().push_update(Ok(UpdateReply {
        success: false,
        message: Some("Stock insuficiente".to_owned()),
        subtotal: None,
    }));

    assert_eq!(block_on(sync.update_quantity("b", 9)), Outcome::Rejected);
    let row = sync.view().row("b").unwrap();
    assert_eq!(row.quantity, "1");
    assert_eq!(row.subtotal, "$20.00");
    assert_eq!(sync.notifier().alerts(), vec!["Error: Stock insuficiente".to_owned()]);
}

#[test]
fn update_quantity_transport_failure_shows_generic_message() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.api().push_update(Err(CartError::Transport("offline".to_owned())));

    assert_eq!(block_on(sync.update_quantity("b", 2)), Outcome::Failed);
    assert_eq!(sync.view().row("b").unwrap().quantity, "1");
    assert_eq!(sync.view().total(), "$20.00");
    assert_eq!(sync.notifier().alerts(), vec![Messages::default().update_failed]);
}

#[test]
fn update_quantity_success_without_subtotal_is_a_failure() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.api().push_update(Ok(UpdateReply { success: true, message: None, subtotal: None }));

    assert_eq!(block_on(sync.update_quantity("b", 2)), Outcome::Failed);
    assert_eq!(sync.view().row("b").unwrap().quantity, "1");
    assert_eq!(sync.notifier().alerts(), vec![Messages::default().update_failed]);
}

#[test]
fn update_quantity_unknown_row_sends_nothing() {
    let sync = cart(&[("b", 1, "$20.00")]);
    assert_eq!(block_on(sync.update_quantity("nope", 2)), Outcome::RowMissing);
    assert!(sync.api().calls().is_empty());
}

#[test]
fn update_quantity_never_prompts() {
    let sync = cart(&[("b", 1, "$20.00")]);
    sync.notifier().answer.set(false);
    sync.api().push_update(Ok(UpdateReply { success: true, message: None, subtotal: Some(40.0) }));
    assert_eq!(block_on(sync.update_quantity("b", 2)), Outcome::Applied);
    assert!(sync.notifier().confirms.borrow().is_empty());
}

// =============================================================
// Scenario
// =============================================================

#[test]
fn delete_then_update_then_empty_scenario() {
    let sync = cart(&[("a", 1, "$10.00"), ("b", 1, "$20.00")]);
    assert_eq!(sync.view().total(), "$30.00");

    sync.api().push_delete(ok());
    assert_eq!(block_on(sync.remove_item("a")), Outcome::Applied);
    assert_eq!(sync.view().total(), "$20.00");

    sync.api().push_update(Ok(UpdateReply { success: true, message: None, subtotal: Some(60.0) }));
    assert_eq!(block_on(sync.update_quantity("b", 3)), Outcome::Applied);
    assert_eq!(sync.view().total(), "$60.00");

    sync.api().push_delete(ok());
    assert_eq!(block_on(sync.remove_item("b")), Outcome::Emptied);
    assert_eq!(sync.view().reloads.get(), 1);
}
