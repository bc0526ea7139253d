//! Networking modules for the cart endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the [`api::CartApi`] seam and its `gloo-net` implementation;
//! `types` defines the JSON bodies the shop backend sends and accepts.

pub mod api;
pub mod types;
