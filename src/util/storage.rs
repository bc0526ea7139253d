//! Browser localStorage helpers for small persisted preferences.
//!
//! SYSTEM CONTEXT
//! ==============
//! Centralizes hydrate-only read/write behavior so feature modules persist
//! values without repeating web-sys glue. Failures are best-effort: a browser
//! with storage disabled simply behaves as if nothing was ever saved.

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    match web_sys::window()?.local_storage() {
        Ok(storage) => storage,
        Err(e) => {
            log::debug!("localStorage unavailable: {e:?}");
            None
        }
    }
}

/// Load the raw string stored under `key`.
#[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
pub fn load_string(key: &str) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        local_storage()?.get_item(key).unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Store `value` under `key`.
#[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
pub fn save_string(key: &str, value: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = local_storage() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("failed to persist {key}: {e:?}");
        }
    }
}
