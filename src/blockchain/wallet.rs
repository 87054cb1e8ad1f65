//! Wallet identity.
//!
//! The read path never signs; it only needs to know which public key a
//! connected wallet represents so queries can be scoped to it.

use std::fmt;

use crate::blockchain::address::Address;

/// A connected wallet as seen by the read path.
pub trait Wallet: Send + Sync {
    fn public_key(&self) -> Address;
}

/// Wallet known only by its public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyWallet {
    public_key: Address,
}

impl PublicKeyWallet {
    pub fn new(public_key: Address) -> Self {
        Self { public_key }
    }
}

impl Wallet for PublicKeyWallet {
    fn public_key(&self) -> Address {
        self.public_key
    }
}

impl fmt::Debug for PublicKeyWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyWallet")
            .field("public_key", &self.public_key.to_base58())
            .finish()
    }
}
