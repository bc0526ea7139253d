//! Cart table synchronization.
//!
//! SYSTEM CONTEXT
//! ==============
//! `view` is the seam over the rendered table, `sync` applies remote mutation
//! outcomes to it, and `dom` (hydrate only) binds the seam to the real
//! `<table>` element.

#[cfg(feature = "hydrate")]
pub mod dom;
pub mod sync;
pub mod view;

pub use sync::{CartSynchronizer, Outcome};
pub use view::CartView;
