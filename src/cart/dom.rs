//! [`CartView`] over the server-rendered cart `<table>`.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use super::view::{CartView, all_rows_selector, row_selector};
use crate::config::CartSelectors;

/// Input class the cart template uses for editable quantities.
pub const QUANTITY_INPUT_CLASS: &str = "cantidad-input";

pub struct DomCartView {
    table: Element,
    selectors: CartSelectors,
}

impl DomCartView {
    pub fn new(table: Element, selectors: CartSelectors) -> Self {
        Self { table, selectors }
    }

    fn row(&self, id: &str) -> Option<Element> {
        select(&self.table, &row_selector(id))
    }

    fn rows(&self) -> Vec<Element> {
        select_all(&self.table, &all_rows_selector())
    }

    fn cell(&self, id: &str, selector: &str) -> Option<Element> {
        select(&self.row(id)?, selector)
    }
}

fn select(parent: &Element, selector: &str) -> Option<Element> {
    match parent.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("invalid selector {selector:?}: {e:?}");
            None
        }
    }
}

fn select_all(parent: &Element, selector: &str) -> Vec<Element> {
    let list = match parent.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("invalid selector {selector:?}: {e:?}");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

impl CartView for DomCartView {
    fn has_row(&self, id: &str) -> bool {
        self.row(id).is_some()
    }

    fn remove_row(&self, id: &str) -> bool {
        match self.row(id) {
            Some(row) => {
                row.remove();
                true
            }
            None => false,
        }
    }

    fn set_quantity(&self, id: &str, quantity: u32) -> bool {
        let Some(cell) = self.cell(id, &self.selectors.quantity) else {
            return false;
        };
        let value = quantity.to_string();
        let input = select(&cell, &format!(".{QUANTITY_INPUT_CLASS}"))
            .and_then(|el| el.dyn_ref::<HtmlInputElement>().cloned());
        match input {
            Some(input) => input.set_value(&value),
            None => cell.set_text_content(Some(&value)),
        }
        true
    }

    fn set_subtotal(&self, id: &str, text: &str) -> bool {
        let Some(cell) = self.cell(id, &self.selectors.subtotal) else {
            return false;
        };
        cell.set_text_content(Some(text));
        true
    }

    fn subtotal_texts(&self) -> Vec<String> {
        self.rows()
            .iter()
            .filter_map(|row| select(row, &self.selectors.subtotal))
            .map(|cell| cell.text_content().unwrap_or_default())
            .collect()
    }

    fn set_total(&self, text: &str) {
        match select(&self.table, &self.selectors.total) {
            Some(cell) => cell.set_text_content(Some(text)),
            None => log::debug!("no total cell matches {:?}", self.selectors.total),
        }
    }

    fn row_count(&self) -> usize {
        self.rows().len()
    }

    fn set_row_busy(&self, id: &str, busy: bool) {
        let Some(row) = self.row(id) else {
            return;
        };
        for control in select_all(&row, "button, input") {
            let result = if busy {
                control.set_attribute("disabled", "")
            } else {
                control.remove_attribute("disabled")
            };
            if let Err(e) = result {
                log::warn!("failed to toggle controls for row {id}: {e:?}");
            }
        }
        if let Err(e) = row.set_attribute("aria-busy", if busy { "true" } else { "false" }) {
            log::debug!("failed to mark row {id} busy: {e:?}");
        }
    }

    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().reload() {
            log::error!("failed to reload empty cart page: {e:?}");
        }
    }
}
