//! Request-handling flows.
//!
//! Each flow orchestrates one or more backing-service calls under a defined
//! failure policy and owns the translation from [`crate::backend::BackendError`]
//! into the discrete user-visible error for the step that failed. Flows are
//! constructed once with their injected clients and shared via
//! [`crate::state::AppState`].

pub mod accounts;
pub mod menu;
pub mod orders;

pub use accounts::AccountService;
pub use menu::MenuService;
pub use orders::OrderService;
