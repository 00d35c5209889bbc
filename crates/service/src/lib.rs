//! Service layer holding the coaster collection.
//! - `store` defines the storage contract and its in-memory implementation.
//! - `errors` carries the outcomes callers are expected to branch on.

pub mod errors;
pub mod store;
