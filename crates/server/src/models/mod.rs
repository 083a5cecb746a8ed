//! Row-backed entity models.
//!
//! These types sit at the storage boundary: each knows how to turn itself
//! into a row object for insertion and (where the backend reads rows back)
//! how to reconstitute itself from one, including decoding the serialized
//! item sequence. Inside the flows everything is strongly typed; raw row
//! JSON never travels further than this module.

pub mod order;
pub mod profile;

pub use order::{FinalizedOrder, NewFinalizedOrder, NewOrder, Order};
pub use profile::Profile;
