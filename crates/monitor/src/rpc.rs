//! JSON-RPC access to the remote node's latest block height.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::worker::MonitorError;

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<T> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: T,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: T,
}

/// Source of the remote chain's latest block height. The worker only sees
/// this trait, so tests can swap in scripted sources.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn latest_block_height(&self) -> Result<u64, MonitorError>;
}

/// `eth_blockNumber` over HTTP JSON-RPC.
pub struct EthRpcSource {
    http: reqwest::Client,
    url: String,
}

impl EthRpcSource {
    /// Builds a source for `url` with a bounded per-request timeout so a
    /// stalled node cannot delay the poll loop beyond one missed cycle.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MonitorError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl BlockSource for EthRpcSource {
    async fn latest_block_height(&self) -> Result<u64, MonitorError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 83,
            method: "eth_blockNumber",
            params: Vec::<serde_json::Value>::new(),
        };

        let response: JsonRpcResponse<String> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_block_height(&response.result)
    }
}

/// Parses a block height the way the node reports it: hex when
/// `0x`-prefixed, decimal otherwise.
pub(crate) fn parse_block_height(raw: &str) -> Result<u64, MonitorError> {
    let parsed = match raw.strip_prefix("0x") {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => raw.parse(),
    };
    parsed.map_err(|err| MonitorError::Rpc(format!("invalid block height `{raw}`: {err}")))
}
