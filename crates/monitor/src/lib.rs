//! Background monitor that polls an Ethereum JSON-RPC node for the latest
//! block height and fans synthetic transactions out to every subscribed
//! address in the shared registry.
//!
//! This is a library crate by design: the registry is process-local, so the
//! monitor runs co-located inside the API process rather than as a separate
//! binary.

pub mod rpc;
pub mod worker;

pub use rpc::{BlockSource, EthRpcSource};
pub use worker::{poll_once, run_monitor, MonitorError};
