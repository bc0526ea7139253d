//! Page configuration handed to the scripts at render time.
//!
//! The server template passes everything the scripts need through markup:
//! the anti-forgery token in `<meta name="csrf-token">` and the rest as
//! `data-*` attributes on `<body>`. Nothing is templated into script source.
//!
//! Recognized keys (attribute name without the `data-` prefix):
//! - `request-timeout-ms`: default 10000
//! - `nav-logo-dark`, `nav-logo-light`, `footer-logo-dark`, `footer-logo-light`
//! - `cart-quantity-selector`, `cart-subtotal-selector`, `cart-total-selector`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::theme::ThemeAssets;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;

pub const KEY_CSRF_TOKEN: &str = "csrf-token";
pub const KEY_REQUEST_TIMEOUT_MS: &str = "request-timeout-ms";
pub const KEY_NAV_LOGO_DARK: &str = "nav-logo-dark";
pub const KEY_NAV_LOGO_LIGHT: &str = "nav-logo-light";
pub const KEY_FOOTER_LOGO_DARK: &str = "footer-logo-dark";
pub const KEY_FOOTER_LOGO_LIGHT: &str = "footer-logo-light";
pub const KEY_QUANTITY_SELECTOR: &str = "cart-quantity-selector";
pub const KEY_SUBTOTAL_SELECTOR: &str = "cart-subtotal-selector";
pub const KEY_TOTAL_SELECTOR: &str = "cart-total-selector";

/// CSS selectors locating cart cells, relative to a row (quantity, subtotal)
/// or to the cart table (total).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartSelectors {
    pub quantity: String,
    pub subtotal: String,
    pub total: String,
}

impl Default for CartSelectors {
    fn default() -> Self {
        Self {
            quantity: "td:nth-child(2)".to_owned(),
            subtotal: "td:nth-child(4)".to_owned(),
            total: "tfoot td:nth-child(2)".to_owned(),
        }
    }
}

/// Shopper-facing texts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages {
    pub confirm_remove: String,
    pub item_removed: String,
    pub error_prefix: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            confirm_remove: "¿Estás seguro de que deseas eliminar este item del carrito?".to_owned(),
            item_removed: "Item eliminado del carrito.".to_owned(),
            error_prefix: "Error: ".to_owned(),
            remove_failed: "Ocurrió un error al eliminar el item. Por favor, intenta de nuevo.".to_owned(),
            update_failed: "Ocurrió un error al actualizar la cantidad. Por favor, intenta de nuevo.".to_owned(),
        }
    }
}

impl Messages {
    /// Text shown for an explicit `success: false` reply.
    pub fn rejection(&self, server_message: &str) -> String {
        format!("{}{server_message}", self.error_prefix)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    pub csrf_token: Option<String>,
    pub request_timeout_ms: u32,
    pub selectors: CartSelectors,
    pub theme: ThemeAssets,
    pub messages: Messages,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            csrf_token: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            selectors: CartSelectors::default(),
            theme: ThemeAssets::default(),
            messages: Messages::default(),
        }
    }
}

impl PageConfig {
    /// Build typed config from a key lookup (see the module docs for keys).
    ///
    /// Blank values count as absent. Unparsable numbers fall back to their
    /// defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let csrf_token = get(KEY_CSRF_TOKEN);
        let defaults = CartSelectors::default();
        let selectors = CartSelectors {
            quantity: get(KEY_QUANTITY_SELECTOR).unwrap_or(defaults.quantity),
            subtotal: get(KEY_SUBTOTAL_SELECTOR).unwrap_or(defaults.subtotal),
            total: get(KEY_TOTAL_SELECTOR).unwrap_or(defaults.total),
        };

        let theme = ThemeAssets {
            nav_logo_dark: get(KEY_NAV_LOGO_DARK).unwrap_or_default(),
            nav_logo_light: get(KEY_NAV_LOGO_LIGHT).unwrap_or_default(),
            footer_logo_dark: get(KEY_FOOTER_LOGO_DARK).unwrap_or_default(),
            footer_logo_light: get(KEY_FOOTER_LOGO_LIGHT).unwrap_or_default(),
        };

        Self {
            csrf_token,
            request_timeout_ms: parse_timeout_ms(get(KEY_REQUEST_TIMEOUT_MS).as_deref()),
            selectors,
            theme,
            messages: Messages::default(),
        }
    }

    /// Read config from the current document's `<meta>` and `<body data-*>`.
    #[cfg(feature = "hydrate")]
    pub fn from_document() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        let body = document.as_ref().and_then(web_sys::Document::body);
        Self::from_lookup(|key| {
            if key == KEY_CSRF_TOKEN {
                let meta = document
                    .as_ref()
                    .and_then(|d| d.query_selector("meta[name=\"csrf-token\"]").unwrap_or_default())?;
                return meta.get_attribute("content");
            }
            body.as_ref()?.get_attribute(&format!("data-{key}"))
        })
    }
}

fn parse_timeout_ms(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_REQUEST_TIMEOUT_MS;
    };
    match raw.parse::<u32>() {
        Ok(ms) if ms > 0 => ms,
        _ => {
            log::warn!("invalid {KEY_REQUEST_TIMEOUT_MS} value {raw:?}; using {DEFAULT_REQUEST_TIMEOUT_MS}");
            DEFAULT_REQUEST_TIMEOUT_MS
        }
    }
}
