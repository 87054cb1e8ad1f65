//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! fill every omitted field from their `Default` impls.

use serde::{Deserialize, Serialize};

/// Root configuration for the account reader.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// RPC transport settings.
    pub rpc: RpcConfig,

    /// Program whose accounts are read.
    pub program: ProgramConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// RPC transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub endpoint: String,

    /// Commitment level sent with every scan.
    pub commitment: String,

    /// Request timeout in seconds, covering connect and body read.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8899".to_string(),
            commitment: "recent".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Target program configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Base58 program id.
    pub program_id: String,

    /// Deployed program version; informational for the read path.
    pub program_version: u8,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: "GovER5Lthms3bLBqWub97yVrMmEogzX7xNjdXpPPCVZw".to_string(),
            program_version: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
