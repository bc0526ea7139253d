//! Errors raised by the cart endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Every variant is terminal for the mutation that produced it: the
//! synchronizer reports it to the shopper and leaves the table untouched.
//! Business rejections (`success: false`) are not errors at this layer; they
//! arrive as a decoded reply.

/// Failure to obtain a usable reply from a cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The request could not be sent or the connection dropped.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The reply body was not the expected JSON shape.
    #[error("malformed reply: {0}")]
    Decode(String),

    /// The request body could not be built.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// No reply arrived within the configured window.
    #[error("no reply within {ms} ms")]
    Timeout { ms: u32 },
}
