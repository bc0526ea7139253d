//! # storefront
//!
//! WASM page scripts for the Casa Bella shop. The server renders every page;
//! this crate adds the interactive pieces on top of that markup:
//!
//! | Module | Role |
//! |--------|------|
//! | [`cart`] | Keeps the cart table and its total in step with remote removals and quantity updates |
//! | [`net`] | Cart endpoint client and JSON bodies |
//! | [`money`] | Exact currency parsing, summing and formatting |
//! | [`config`] | Typed page configuration read from `<meta>`/`data-*` markup |
//! | [`theme`] | Persisted light/dark toggle and themed logos |
//! | [`map`] | Store-location map options and the maps-script callback |
//! | [`util`] | Dialogs and `localStorage` glue |
//!
//! Browser bindings live behind the `hydrate` feature; without it every
//! module still builds and its logic is testable on the host.

#[cfg(feature = "hydrate")]
pub mod bindings;
pub mod cart;
pub mod config;
pub mod error;
pub mod map;
pub mod money;
pub mod net;
pub mod theme;
pub mod util;
