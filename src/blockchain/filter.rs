//! Server-side account filters.
//!
//! A [`MemcmpFilter`] selects accounts whose payload contains a given byte
//! pattern at a given offset. The node evaluates filters during a
//! `getProgramAccounts` scan; [`MemcmpFilter::matches`] evaluates the same
//! predicate locally.

use serde_json::{json, Value};
use thiserror::Error;

use crate::blockchain::address::Address;

/// Offset of the account type tag in every program account payload.
pub const ACCOUNT_TYPE_OFFSET: usize = 0;

/// Filter construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("memcmp filter pattern must not be empty")]
    EmptyPattern,
}

/// Byte-equality predicate at a fixed payload offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    offset: usize,
    bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn new(offset: usize, bytes: Vec<u8>) -> Result<Self, FilterError> {
        if bytes.is_empty() {
            return Err(FilterError::EmptyPattern);
        }
        Ok(Self { offset, bytes })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true if `buffer` holds this filter's pattern at its offset.
    ///
    /// A pattern that would run past the end of `buffer` is a non-match.
    pub fn matches(&self, buffer: &[u8]) -> bool {
        let end = match self.offset.checked_add(self.bytes.len()) {
            Some(end) if end <= buffer.len() => end,
            _ => return false,
        };

        buffer[self.offset..end]
            .iter()
            .zip(&self.bytes)
            .all(|(actual, expected)| actual == expected)
    }

    /// Wire form expected by `getProgramAccounts`; bytes are base58 text.
    pub fn to_rpc_json(&self) -> Value {
        json!({
            "memcmp": {
                "offset": self.offset,
                "bytes": bs58::encode(&self.bytes).into_string(),
            }
        })
    }
}

/// Builds a filter on an address field, or nothing when no address is given.
///
/// Lets callers write "filter by owner if one was supplied" without
/// branching at the call site.
pub fn pubkey_filter(offset: usize, address: Option<&Address>) -> Option<MemcmpFilter> {
    address.map(|addr| MemcmpFilter {
        offset,
        bytes: addr.as_bytes().to_vec(),
    })
}

/// A single entry of the server-side filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcFilter {
    /// Account type tag at offset 0.
    AccountType(u8),
    /// Arbitrary field equality.
    Memcmp(MemcmpFilter),
}

impl RpcFilter {
    /// Resolves to the equivalent byte filter.
    pub fn as_memcmp(&self) -> MemcmpFilter {
        match self {
            RpcFilter::AccountType(tag) => MemcmpFilter {
                offset: ACCOUNT_TYPE_OFFSET,
                bytes: vec![*tag],
            },
            RpcFilter::Memcmp(filter) => filter.clone(),
        }
    }

    pub fn matches(&self, buffer: &[u8]) -> bool {
        match self {
            RpcFilter::AccountType(tag) => buffer.get(ACCOUNT_TYPE_OFFSET) == Some(tag),
            RpcFilter::Memcmp(filter) => filter.matches(buffer),
        }
    }

    pub fn to_rpc_json(&self) -> Value {
        self.as_memcmp().to_rpc_json()
    }
}

impl From<MemcmpFilter> for RpcFilter {
    fn from(filter: MemcmpFilter) -> Self {
        RpcFilter::Memcmp(filter)
    }
}

/// Filter list for a typed scan: the account type tag first, then the
/// caller's filters in order.
pub fn build_filter_list(account_type: u8, filters: &[MemcmpFilter]) -> Vec<RpcFilter> {
    std::iter::once(RpcFilter::AccountType(account_type))
        .chain(filters.iter().cloned().map(RpcFilter::Memcmp))
        .collect()
}
