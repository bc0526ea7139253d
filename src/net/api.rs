//! Cart endpoint client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, each raced against
//! a `gloo-timers` timeout.
//! Host builds: only the [`CartApi`] seam and the pure helpers exist, so the
//! synchronizer can be exercised with in-memory fakes.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx statuses, send failures, undecodable bodies and timeouts all map to
//! [`CartError`]. A decoded `success: false` body is returned as `Ok` so the
//! caller can show the server's own message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use futures::future::{Either, select};

use super::types::{ApiReply, UpdateReply};
use crate::error::CartError;

/// Header carrying the page's anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Remote mutations the cart synchronizer depends on.
///
/// Futures are not `Send`: everything runs on the browser's UI thread.
#[allow(async_fn_in_trait)]
pub trait CartApi {
    /// `POST /client/eliminar_del_carrito/{id}`.
    async fn delete_item(&self, id: &str) -> Result<ApiReply, CartError>;

    /// `POST /client/actualizar_cantidad/{id}` with `{"cantidad": quantity}`.
    async fn update_quantity(&self, id: &str, quantity: u32) -> Result<UpdateReply, CartError>;
}

pub fn delete_endpoint(id: &str) -> String {
    format!("/client/eliminar_del_carrito/{}", encode_path_segment(id))
}

pub fn update_endpoint(id: &str) -> String {
    format!("/client/actualizar_cantidad/{}", encode_path_segment(id))
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
        }
    }
    out
}

/// Race `request` against `timer`; the timer winning yields [`CartError::Timeout`].
///
/// # Errors
///
/// Returns the request's own error, or `Timeout { ms }` when `timer` resolves first.
pub async fn with_timeout<T, R, D>(request: R, timer: D, ms: u32) -> Result<T, CartError>
where
    R: Future<Output = Result<T, CartError>>,
    D: Future<Output = ()>,
{
    let request = std::pin::pin!(request);
    let timer = std::pin::pin!(timer);
    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(CartError::Timeout { ms }),
    }
}

#[cfg(feature = "hydrate")]
pub use http::HttpCartApi;

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{Request, RequestBuilder};
    use gloo_timers::future::TimeoutFuture;
    use serde::de::DeserializeOwned;

    use super::{CSRF_HEADER, CartApi, delete_endpoint, update_endpoint, with_timeout};
    use crate::error::CartError;
    use crate::net::types::{ApiReply, UpdateReply, UpdateRequest};

    /// `gloo-net` implementation of [`CartApi`].
    #[derive(Clone, Debug)]
    pub struct HttpCartApi {
        csrf_token: Option<String>,
        timeout_ms: u32,
    }

    impl HttpCartApi {
        pub fn new(csrf_token: Option<String>, timeout_ms: u32) -> Self {
            Self { csrf_token, timeout_ms }
        }

        fn post(&self, url: &str) -> RequestBuilder {
            let builder = Request::post(url).header("Content-Type", "application/json");
            match &self.csrf_token {
                Some(token) => builder.header(CSRF_HEADER, token),
                None => builder,
            }
        }

        async fn exchange<T: DeserializeOwned>(&self, request: Request) -> Result<T, CartError> {
            let url = request.url();
            let result = with_timeout(send_json(request), TimeoutFuture::new(self.timeout_ms), self.timeout_ms).await;
            if let Err(e) = &result {
                log::error!("cart request {url} failed: {e}");
            }
            result
        }
    }

    async fn send_json<T: DeserializeOwned>(request: Request) -> Result<T, CartError> {
        let resp = request
            .send()
            .await
            .map_err(|e| CartError::Transport(e.to_string()))?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(CartError::Status(status));
        }
        resp.json::<T>()
            .await
            .map_err(|e| CartError::Decode(e.to_string()))
    }

    impl CartApi for HttpCartApi {
        async fn delete_item(&self, id: &str) -> Result<ApiReply, CartError> {
            let request = self
                .post(&delete_endpoint(id))
                .build()
                .map_err(|e| CartError::Encode(e.to_string()))?;
            self.exchange(request).await
        }

        async fn update_quantity(&self, id: &str, quantity: u32) -> Result<UpdateReply, CartError> {
            let request = self
                .post(&update_endpoint(id))
                .json(&UpdateRequest { cantidad: quantity })
                .map_err(|e| CartError::Encode(e.to_string()))?;
            self.exchange(request).await
        }
    }
}
