//! Program account read path.
//!
//! # Data Flow
//! ```text
//! caller filters (filter.rs)
//!     → client.rs (getProgramAccounts with memcmp filters)
//!     → types.rs (JSON-RPC envelope, keyed accounts)
//!     → record.rs (typed decode per account, failures to DecodeLog)
//!     → AccountBatch<T> keyed by base58 address
//! ```
//!
//! # Constraints
//! - One request per fetch, no retry, no pagination
//! - A transport failure fails the fetch; a decode failure skips one account
//! - Raw payload bytes are not retained after decoding

pub mod address;
pub mod client;
pub mod context;
pub mod filter;
pub mod record;
pub mod types;
pub mod wallet;

pub use address::{Address, AddressError};
pub use client::{decode_program_accounts, fetch_typed_accounts, AccountFetcher};
pub use context::{ContextError, RpcContext};
pub use filter::{pubkey_filter, FilterError, MemcmpFilter, RpcFilter};
pub use record::{AccountRecord, DecodeLog, NoopDecodeLog, TracingDecodeLog};
pub use types::{
    AccountBatch, DecodeError, FetchError, FetchResult, ParsedAccount, RpcAccount,
    RpcKeyedAccount, MAX_ERROR_BODY_CHARS,
};
pub use wallet::{PublicKeyWallet, Wallet};
