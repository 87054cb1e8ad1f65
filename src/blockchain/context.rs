//! RPC context for one deployed program instance.
//!
//! Bundles the program id, its version, the RPC endpoint and an optional
//! connected wallet. Asking for the wallet's key without a wallet fails
//! fast so write paths cannot proceed unsigned.

use std::sync::Arc;

use thiserror::Error;

use crate::blockchain::address::Address;
use crate::blockchain::client::AccountFetcher;
use crate::blockchain::types::FetchResult;
use crate::blockchain::wallet::Wallet;
use crate::config::schema::ClientConfig;

/// Errors raised by the context itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid program id '{0}'")]
    InvalidProgramId(String),
}

#[derive(Clone)]
pub struct RpcContext {
    pub program_id: Address,
    pub program_version: u8,
    pub wallet: Option<Arc<dyn Wallet>>,
    pub endpoint: String,
}

impl RpcContext {
    pub fn new(
        program_id: Address,
        program_version: u8,
        wallet: Option<Arc<dyn Wallet>>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            program_id,
            program_version,
            wallet,
            endpoint: endpoint.into(),
        }
    }

    /// Build a wallet-less context from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ContextError> {
        let program_id = config
            .program
            .program_id
            .parse()
            .map_err(|_| ContextError::InvalidProgramId(config.program.program_id.clone()))?;

        Ok(Self::new(
            program_id,
            config.program.program_version,
            None,
            config.rpc.endpoint.clone(),
        ))
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn Wallet>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Public key of the connected wallet.
    pub fn wallet_pubkey(&self) -> Result<Address, ContextError> {
        self.wallet
            .as_ref()
            .map(|w| w.public_key())
            .ok_or(ContextError::WalletNotConnected)
    }

    pub fn program_id_base58(&self) -> String {
        self.program_id.to_base58()
    }

    /// Fetcher bound to this context's endpoint.
    pub fn fetcher(&self, config: &ClientConfig) -> FetchResult<AccountFetcher> {
        let mut rpc = config.rpc.clone();
        rpc.endpoint = self.endpoint.clone();
        AccountFetcher::new(&rpc)
    }
}

impl std::fmt::Debug for RpcContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcContext")
            .field("program_id", &self.program_id_base58())
            .field("program_version", &self.program_version)
            .field("wallet", &self.wallet.as_ref().map(|w| w.public_key()))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
