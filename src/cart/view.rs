//! The displayed cart: line-item rows and the total cell.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

/// Attribute carrying a row's line-item id in the cart template.
pub const ROW_ID_ATTR: &str = "data-detalle-id";

/// Mutable view of the rendered cart table.
///
/// Rows are addressed by their line-item (detail) id. Mutators return
/// `false` when the row is not displayed, so callers can treat a vanished
/// row as a no-op.
pub trait CartView {
    fn has_row(&self, id: &str) -> bool;

    fn remove_row(&self, id: &str) -> bool;

    fn set_quantity(&self, id: &str, quantity: u32) -> bool;

    fn set_subtotal(&self, id: &str, text: &str) -> bool;

    /// Text of every displayed subtotal cell, in row order.
    fn subtotal_texts(&self) -> Vec<String>;

    fn set_total(&self, text: &str);

    fn row_count(&self) -> usize;

    /// Disable or re-enable the row's controls while a request is pending.
    fn set_row_busy(&self, id: &str, busy: bool);

    /// Terminal action once the last row is gone: reload the page so the
    /// server renders its empty-cart state.
    fn reload(&self);
}

/// Selector for the row with line-item `id`.
pub fn row_selector(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("tr[{ROW_ID_ATTR}=\"{escaped}\"]")
}

/// Selector matching every line-item row.
pub fn all_rows_selector() -> String {
    format!("tr[{ROW_ID_ATTR}]")
}

/// Quantity typed into a row's input; only positive whole numbers count.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(quantity) => Some(quantity),
    }
}
