//! Core types for Sabor.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod menu;
pub mod status;

pub use cart::CartLine;
pub use email::{Email, EmailError};
pub use id::*;
pub use menu::{MenuItem, UNCATEGORIZED};
pub use status::OrderStatus;
