//! JSON-RPC request and response shapes spoken by Bitcoin-family wallet back ends
//!
//! Only the message shapes live here; transport belongs to the caller.

use crate::transaction;
use crate::types::Transaction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Back-end operations used by the wallets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    GetAddressBalance,
    GetAddressTxids,
    GetBlock,
    GetRawTransaction,
    GetAddressUtxos,
    SendRawTransaction,
}

impl RpcMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RpcMethod::GetAddressBalance => "getaddressbalance",
            RpcMethod::GetAddressTxids => "getaddresstxids",
            RpcMethod::GetBlock => "getblock",
            RpcMethod::GetRawTransaction => "getrawtransaction",
            RpcMethod::GetAddressUtxos => "getaddressutxos",
            RpcMethod::SendRawTransaction => "sendrawtransaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<String>,
}

impl RpcRequest {
    pub fn new(method: RpcMethod, params: Vec<String>) -> Self {
        Self {
            method: method.as_str().to_string(),
            params,
        }
    }

    /// `sendrawtransaction` carrying the hex of the serialized transaction
    pub fn send_raw_transaction(tx: &Transaction) -> Self {
        Self::new(
            RpcMethod::SendRawTransaction,
            vec![hex::encode(transaction::serialize(tx))],
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Error object carried in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RpcError {
    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("RPC response has neither result nor error")]
    EmptyResponse,

    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

impl<T: DeserializeOwned> RpcResponse<T> {
    pub fn from_json(json: &str) -> Result<Self, RpcError> {
        serde_json::from_str(json).map_err(|e| RpcError::Malformed(e.to_string()))
    }
}

impl<T> RpcResponse<T> {
    /// The error object wins over a result
    pub fn into_result(self) -> Result<T, RpcError> {
        match (self.result, self.error) {
            (_, Some(e)) => Err(RpcError::Remote {
                code: e.code,
                message: e.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::EmptyResponse),
        }
    }
}
