//! HTTP middleware and extractors.
//!
//! The only request-scoped concern this backend has is the credential
//! gateway: resolving `Authorization: Bearer <token>` to an identity before
//! any user-scoped flow runs. It is an extractor rather than a layer so the
//! resolved identity is an explicit handler argument, not hidden request
//! state.

pub mod auth;

pub use auth::CurrentUser;
