//! Browser helpers shared across the page scripts.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (dialogs, storage)
//! from cart and theme logic to keep the latter host-testable.

pub mod notify;
pub mod storage;
