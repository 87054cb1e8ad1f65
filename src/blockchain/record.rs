//! Typed program account records.
//!
//! A record type describes its own binary layout through `BorshDeserialize`
//! and reports its account type tag. The fetcher uses the tag of the
//! record's default value as the scan discriminator unless the caller
//! overrides it.

use borsh::BorshDeserialize;

use crate::blockchain::types::DecodeError;

/// A program account shape that can be decoded from a raw payload.
pub trait AccountRecord: BorshDeserialize + Default {
    /// Human-readable type name used in diagnostics.
    const NAME: &'static str;

    /// Account type tag carried by this value.
    fn account_type(&self) -> u8;

    /// Tag used to narrow scans to this record type.
    fn discriminator() -> u8 {
        Self::default().account_type()
    }

    /// Decodes a record from the front of `data`.
    ///
    /// Trailing bytes are ignored; program accounts are often allocated
    /// larger than their current contents.
    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        decode_prefix(data)
    }
}

/// Reads a borsh value from the front of `data`, ignoring what follows.
pub fn decode_prefix<T: BorshDeserialize>(data: &[u8]) -> Result<T, DecodeError> {
    let mut cursor = data;
    Ok(T::deserialize(&mut cursor)?)
}

/// Sink for per-account decode failures.
pub trait DecodeLog: Send + Sync {
    fn decode_failed(&self, record: &str, pubkey: &str, error: &DecodeError);
}

/// Reports decode failures as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDecodeLog;

impl DecodeLog for TracingDecodeLog {
    fn decode_failed(&self, record: &str, pubkey: &str, error: &DecodeError) {
        tracing::info!(
            record = record,
            pubkey = pubkey,
            error = %error,
            "Can't deserialize account"
        );
    }
}

/// Discards decode failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDecodeLog;

impl DecodeLog for NoopDecodeLog {
    fn decode_failed(&self, _record: &str, _pubkey: &str, _error: &DecodeError) {}
}
