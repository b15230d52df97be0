//! Data structures shared by the API and monitor crates.

use hex::encode as hex_encode;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// A transaction observed for a subscribed address.
///
/// Serialized field names follow the wire contract of the HTTP surface
/// (`Hash`, `From`, `To`, `Value`, `BlockNumber`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub block_number: u64,
}

/// Placeholder sender stamped on synthetic transactions until a real
/// transaction decoder lands.
pub const PLACEHOLDER_FROM: &str = "0x123";

/// Placeholder amount stamped on synthetic transactions.
pub const PLACEHOLDER_VALUE: &str = "1 ETH";

/// Deterministically derives a SHA3-256 hash for a synthetic transaction
/// from the receiving address and the block height it was observed at.
pub fn derive_transaction_hash(address: &str, block_number: u64) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(address.as_bytes());
    hasher.update(block_number.to_be_bytes());
    let digest = hasher.finalize();
    format!("0x{}", hex_encode(digest))
}

/// Builds the transaction appended to a subscriber when a new block is
/// observed. Only the recipient and block height vary; sender and amount
/// stay fixed placeholders.
pub fn synthetic_transaction(address: &str, block_number: u64) -> Transaction {
    Transaction {
        hash: derive_transaction_hash(address, block_number),
        from: PLACEHOLDER_FROM.to_string(),
        to: address.to_string(),
        value: PLACEHOLDER_VALUE.to_string(),
        block_number,
    }
}
