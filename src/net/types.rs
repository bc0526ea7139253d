//! JSON bodies exchanged with the cart endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the shop backend (`cantidad`, `subtotal`) so serde
//! mapping stays one-to-one with the server's `jsonify` payloads.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Reply to a line-item deletion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiReply {
    pub success: bool,
    /// Human-readable reason, present when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply to a quantity update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Authoritative line subtotal after the update.
    #[serde(default)]
    pub subtotal: Option<f64>,
}

/// Body of a quantity update request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub cantidad: u32,
}

impl ApiReply {
    /// The rejection text to show, or an empty string when the server sent none.
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

impl UpdateReply {
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}
