//! JSON-RPC wallet connector.
//!
//! Speaks the EIP-1193 method set a browser wallet exposes
//! (`eth_requestAccounts`, `eth_sendTransaction`, `personal_sign`, ...) to
//! any endpoint that manages the user's key, such as a wallet's local RPC
//! bridge or a development node with unlocked accounts.

use super::{Wallet, WalletConnector};
use crate::config::NetworkConfig;
use crate::contracts::ContractRevert;
use crate::error::{Error, Result};
use alloy_primitives::{Address, Bytes, TxHash, U64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// EIP-1193 "user rejected request".
const USER_REJECTED: i64 = 4001;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    /// Revert data carried by the error, either as a bare hex string or
    /// nested under `data`.
    fn revert_data(&self) -> Option<Bytes> {
        let raw = match self.data.as_ref()? {
            Value::String(s) => s.as_str(),
            Value::Object(map) => map.get("data")?.as_str()?,
            _ => return None,
        };
        raw.parse().ok()
    }
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        if let Some(err) = self.error {
            if err.code == USER_REJECTED {
                return Err(Error::Wallet(format!("{method} rejected by user")));
            }
            if let Some(data) = err.revert_data() {
                if !data.is_empty() {
                    return Err(Error::Revert(ContractRevert::decode(&data)));
                }
            }
            return Err(Error::Rpc(format!(
                "{method} failed: {} (code {})",
                err.message, err.code
            )));
        }
        self.result
            .ok_or_else(|| Error::Rpc(format!("{method} returned no result")))
    }
}

/// HTTP JSON-RPC transport.
struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    fn new(config: &NetworkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            url: config.rpc_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("RPC {} (id={})", method, id);

        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_result(method)
    }
}

/// Connector for a JSON-RPC wallet endpoint.
pub struct RpcConnector {
    client: Arc<RpcClient>,
    chain_id: u64,
}

impl RpcConnector {
    /// Create a connector for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(RpcClient::new(config)?),
            chain_id: config.chain_id,
        })
    }

    /// Endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.client.url
    }
}

impl WalletConnector for RpcConnector {
    type Wallet = RpcWallet;

    fn name(&self) -> &str {
        "json-rpc"
    }

    async fn provider_available(&self) -> bool {
        match self.client.request::<U64>("eth_chainId", json!([])).await {
            Ok(id) if id.to::<u64>() == self.chain_id => true,
            Ok(id) => {
                warn!(
                    "Wallet is on chain {} but {} is required",
                    id, self.chain_id
                );
                false
            }
            Err(e) => {
                debug!("No wallet provider at {}: {}", self.client.url, e);
                false
            }
        }
    }

    async fn connect(&self) -> Result<RpcWallet> {
        let accounts: Vec<Address> = self
            .client
            .request("eth_requestAccounts", json!([]))
            .await?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| Error::Wallet("wallet exposed no accounts".to_string()))?;

        Ok(RpcWallet {
            client: Arc::clone(&self.client),
            address,
        })
    }
}

/// A wallet account reached over JSON-RPC.
pub struct RpcWallet {
    client: Arc<RpcClient>,
    address: Address,
}

impl Wallet for RpcWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<TxHash> {
        self.client
            .request(
                "eth_sendTransaction",
                json!([{ "from": self.address, "to": to, "data": data }]),
            )
            .await
    }

    async fn sign_message(&self, message: &str) -> Result<Bytes> {
        let payload = format!("0x{}", hex::encode(message.as_bytes()));
        self.client
            .request("personal_sign", json!([payload, self.address]))
            .await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.client
            .request(
                "eth_call",
                json!([{ "from": self.address, "to": to, "data": data }, "latest"]),
            )
            .await
    }
}
