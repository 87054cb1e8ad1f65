//! Read-path client for governance program accounts.
//!
//! Scans a program's accounts over JSON-RPC with server-side memcmp filters
//! and decodes each payload into a typed record.

pub mod blockchain;
pub mod config;
pub mod governance;
pub mod observability;

pub use blockchain::{
    fetch_typed_accounts, pubkey_filter, AccountBatch, AccountFetcher, AccountRecord, Address,
    MemcmpFilter, ParsedAccount, RpcContext,
};
pub use config::ClientConfig;
