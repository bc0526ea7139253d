//! JavaScript entry points.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages import the generated module and call the `init*` functions with the
//! element handles they own; nothing is wired implicitly on load except the
//! logger and the globals that legacy templates and the maps script call by
//! name (`initMap`, `eliminarItem`, `actualizarCantidad`).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::cart::dom::{DomCartView, QUANTITY_INPUT_CLASS};
use crate::cart::view::{ROW_ID_ATTR, all_rows_selector, parse_quantity};
use crate::cart::{CartSynchronizer, CartView, Outcome};
use crate::config::PageConfig;
use crate::map;
use crate::net::api::{CSRF_HEADER, HttpCartApi};
use crate::theme::ThemeToggle;
use crate::util::notify::BrowserNotifier;

/// Attribute marking a control that removes its row.
const ACTION_ATTR: &str = "data-cart-action";

type BrowserCart = CartSynchronizer<DomCartView, HttpCartApi, BrowserNotifier>;

thread_local! {
    static CART: RefCell<Option<Rc<BrowserCart>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {e}")));
    }

    install_global("initMap", Closure::<dyn Fn()>::new(map::init_map).into_js_value());
    install_global("eliminarItem", Closure::<dyn Fn(JsValue)>::new(remove_item).into_js_value());
    install_global(
        "actualizarCantidad",
        Closure::<dyn Fn(JsValue, JsValue)>::new(update_quantity).into_js_value(),
    );
}

fn install_global(name: &str, value: JsValue) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = js_sys::Reflect::set(window.as_ref(), &JsValue::from_str(name), &value) {
        log::warn!("failed to install window.{name}: {e:?}");
    }
}

fn listen<F>(target: &Element, kind: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
        Ok(()) => closure.forget(),
        Err(e) => log::warn!("failed to attach {kind} listener: {e:?}"),
    }
}

/// Bind the cart synchronizer to `table` and handle its remove/quantity controls.
///
/// Remove controls carry `data-cart-action="remove"`; quantity inputs carry
/// the `cantidad-input` class. Both resolve their line item from their own
/// `data-detalle-id` or the enclosing row's.
#[wasm_bindgen(js_name = initCart)]
pub fn init_cart(table: Element) {
    let config = PageConfig::from_document();
    if config.csrf_token.is_none() {
        log::warn!("no csrf-token meta tag on page; cart requests will be sent without {CSRF_HEADER}");
    }
    let cart = Rc::new(CartSynchronizer::new(
        DomCartView::new(table.clone(), config.selectors),
        HttpCartApi::new(config.csrf_token, config.request_timeout_ms),
        BrowserNotifier,
        config.messages,
    ));

    let for_click = Rc::clone(&cart);
    listen(&table, "click", move |event| on_click(&for_click, &event));
    let for_change = Rc::clone(&cart);
    listen(&table, "change", move |event| on_change(&for_change, &event));

    log::info!("cart initialized with {} rows", cart.view().row_count());
    CART.with(|slot| *slot.borrow_mut() = Some(cart));
}

/// Remove a line item through the cart installed by [`init_cart`].
#[wasm_bindgen(js_name = removeItem)]
pub fn remove_item(id: JsValue) {
    let (Some(cart), Some(id)) = (installed_cart(), id_from_js(&id)) else {
        log::warn!("removeItem called before initCart or without an id");
        return;
    };
    spawn_remove(cart, id);
}

/// Update a line item's quantity through the cart installed by [`init_cart`].
#[wasm_bindgen(js_name = updateQuantity)]
pub fn update_quantity(id: JsValue, quantity: JsValue) {
    let (Some(cart), Some(id)) = (installed_cart(), id_from_js(&id)) else {
        log::warn!("updateQuantity called before initCart or without an id");
        return;
    };
    let Some(quantity) = id_from_js(&quantity).as_deref().and_then(parse_quantity) else {
        log::warn!("ignoring invalid quantity {quantity:?} for {id}");
        return;
    };
    spawn_update(cart, id, quantity);
}

/// Entry point for the maps script callback.
#[wasm_bindgen(js_name = initMap)]
pub fn init_map() {
    map::init_map();
}

/// Restore the stored theme and toggle it on `button` clicks.
#[wasm_bindgen(js_name = initThemeToggle)]
pub fn init_theme_toggle(button: HtmlElement, nav_logo: Option<HtmlImageElement>, footer_logo: Option<HtmlImageElement>) {
    let assets = PageConfig::from_document().theme;
    let toggle = Rc::new(ThemeToggle::new(button, nav_logo, footer_logo, assets));
    let theme = toggle.restore();
    log::debug!("theme restored as {}", theme.as_str());

    let for_click = Rc::clone(&toggle);
    listen(toggle.button(), "click", move |_| {
        for_click.toggle();
    });
}

fn installed_cart() -> Option<Rc<BrowserCart>> {
    CART.with(|slot| slot.borrow().clone())
}

/// Accept ids and quantities passed from templates as either strings or numbers.
fn id_from_js(value: &JsValue) -> Option<String> {
    if let Some(text) = value.as_string() {
        return Some(text);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .map(|n| format!("{n:.0}"))
}

fn line_item_id(control: &Element) -> Option<String> {
    if let Some(id) = control.get_attribute(ROW_ID_ATTR) {
        return Some(id);
    }
    control
        .closest(&all_rows_selector())
        .unwrap_or_default()?
        .get_attribute(ROW_ID_ATTR)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_ref::<Element>().cloned()
}

fn on_click(cart: &Rc<BrowserCart>, event: &Event) {
    let Some(target) = event_element(event) else {
        return;
    };
    let Some(control) = target
        .closest(&format!("[{ACTION_ATTR}=\"remove\"]"))
        .unwrap_or_default()
    else {
        return;
    };
    event.prevent_default();
    match line_item_id(&control) {
        Some(id) => spawn_remove(Rc::clone(cart), id),
        None => log::debug!("remove control without a line-item id"),
    }
}

fn on_change(cart: &Rc<BrowserCart>, event: &Event) {
    let Some(input) = event_element(event).and_then(|el| el.dyn_ref::<HtmlInputElement>().cloned()) else {
        return;
    };
    if !input.matches(&format!(".{QUANTITY_INPUT_CLASS}")).unwrap_or_default() {
        return;
    }
    let Some(id) = line_item_id(&input) else {
        log::debug!("quantity input without a line-item id");
        return;
    };
    let raw = input.value();
    let Some(quantity) = parse_quantity(&raw) else {
        log::warn!("ignoring invalid quantity {raw:?} for {id}");
        return;
    };
    spawn_update(Rc::clone(cart), id, quantity);
}

fn spawn_remove(cart: Rc<BrowserCart>, id: String) {
    spawn_local(async move {
        let outcome = cart.remove_item(&id).await;
        log_outcome("remove", &id, outcome);
    });
}

fn spawn_update(cart: Rc<BrowserCart>, id: String, quantity: u32) {
    spawn_local(async move {
        let outcome = cart.update_quantity(&id, quantity).await;
        log_outcome("update", &id, outcome);
    });
}

fn log_outcome(op: &str, id: &str, outcome: Outcome) {
    log::debug!("{op} {id}: {outcome:?}");
}
