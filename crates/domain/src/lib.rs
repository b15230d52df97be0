//! Domain-level building blocks shared across the API and monitor crates:
//! configuration loading, the transaction model and the in-memory registry
//! that both halves of the service read and mutate.

pub mod config;
pub mod model;
pub mod registry;
pub mod services;

pub use model::{derive_transaction_hash, synthetic_transaction, Transaction};
pub use registry::Registry;
