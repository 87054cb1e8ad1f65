//! Wire types and error definitions for account reads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::address::{Address, AddressError};

/// Encoding requested for account payloads.
pub const ACCOUNT_DATA_ENCODING: &str = "base64";

/// Longest response body kept in a [`FetchError::Status`].
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Errors that fail a whole fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("RPC transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Node answered with a non-success HTTP status. `body` holds at most
    /// [`MAX_ERROR_BODY_CHARS`] characters of the response.
    #[error("RPC returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body was not a usable JSON-RPC envelope.
    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    /// Endpoint URL could not be parsed.
    #[error("Invalid RPC endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("RPC timeout must be greater than zero")]
    InvalidTimeout,
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors confined to a single account entry; the batch continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Entry did not have the expected JSON shape.
    #[error("malformed account entry: {0}")]
    Entry(String),

    #[error("invalid account address: {0}")]
    Address(#[from] AddressError),

    #[error("unsupported data encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload does not fit the record's binary layout.
    #[error("layout mismatch: {0}")]
    Layout(#[from] std::io::Error),

    /// Record type refused the decoded values.
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// One element of a `getProgramAccounts` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcKeyedAccount {
    pub pubkey: String,
    pub account: RpcAccount,
}

/// Account envelope as returned by the node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcAccount {
    #[serde(default)]
    pub lamports: u64,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub executable: bool,

    #[serde(default)]
    pub rent_epoch: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<u64>,

    /// `[payload, encoding]`; emptied once the payload has been decoded.
    pub data: Vec<String>,
}

impl RpcAccount {
    /// Splits `data` into payload and encoding.
    pub fn payload(&self) -> Result<(&str, &str), DecodeError> {
        match self.data.as_slice() {
            [payload, encoding] => Ok((payload.as_str(), encoding.as_str())),
            other => Err(DecodeError::Entry(format!(
                "expected [payload, encoding], got {} element(s)",
                other.len()
            ))),
        }
    }
}

/// A decoded program account.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedAccount<T> {
    pub pubkey: Address,
    /// Envelope metadata with the raw payload dropped.
    pub account: RpcAccount,
    pub info: T,
}

/// Decoded accounts keyed by base58 address.
pub type AccountBatch<T> = HashMap<String, ParsedAccount<T>>;

/// JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC response envelope; `result` is kept untyped so each entry can
/// fail on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}
