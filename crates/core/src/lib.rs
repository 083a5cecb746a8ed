//! Sabor Core - Shared types library.
//!
//! This crate provides the domain types used across the Sabor order backend.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! that talks to the backing auth/persistence service lives in the server
//! crate; this crate defines the values that cross those boundaries.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, cart lines, menu items, order status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
