//! Blocking shopper prompts.
//!
//! The cart flow needs exactly two interactions: a yes/no confirmation before
//! an irreversible removal and a modal notice for outcomes. [`Notifier`] is
//! the seam; [`BrowserNotifier`] maps it onto `window.confirm`/`window.alert`.

pub trait Notifier {
    /// Ask a yes/no question. `false` when the shopper declines or no UI is available.
    fn confirm(&self, message: &str) -> bool;

    /// Show a notice and wait for acknowledgement.
    fn alert(&self, message: &str);
}

/// `window.confirm` / `window.alert` notifier.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNotifier;

#[cfg(feature = "hydrate")]
impl Notifier for BrowserNotifier {
    fn confirm(&self, message: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        window.confirm_with_message(message).unwrap_or_else(|e| {
            log::warn!("confirm dialog failed: {e:?}");
            false
        })
    }

    fn alert(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window for alert: {message}");
            return;
        };
        if let Err(e) = window.alert_with_message(message) {
            log::warn!("alert dialog failed: {e:?}");
        }
    }
}
