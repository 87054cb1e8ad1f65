//! Program account fetcher.
//!
//! # Responsibilities
//! - Build `getProgramAccounts` requests with server-side memcmp filters
//! - Surface transport failures to the caller without retrying
//! - Decode each returned account into a typed record, skipping entries
//!   that fail and reporting them through a [`DecodeLog`]

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use url::Url;

use crate::blockchain::address::Address;
use crate::blockchain::filter::{build_filter_list, MemcmpFilter, RpcFilter};
use crate::blockchain::record::{AccountRecord, DecodeLog, TracingDecodeLog};
use crate::blockchain::types::{
    AccountBatch, DecodeError, FetchError, FetchResult, ParsedAccount, RpcKeyedAccount,
    RpcResponse, ACCOUNT_DATA_ENCODING, MAX_ERROR_BODY_CHARS,
};
use crate::config::schema::RpcConfig;
use crate::observability::metrics;

/// JSON-RPC method used for program scans.
pub const GET_PROGRAM_ACCOUNTS: &str = "getProgramAccounts";

/// Reads and decodes accounts owned by a program.
#[derive(Clone)]
pub struct AccountFetcher {
    http: reqwest::Client,
    endpoint: Url,
    commitment: String,
    decode_log: Arc<dyn DecodeLog>,
}

impl AccountFetcher {
    /// Create a fetcher for the configured endpoint.
    ///
    /// The HTTP client's request timeout is the only bound on a fetch, so
    /// a zero timeout is refused.
    pub fn new(config: &RpcConfig) -> FetchResult<Self> {
        let endpoint: Url = config
            .endpoint
            .parse()
            .map_err(|_| FetchError::InvalidEndpoint(config.endpoint.clone()))?;

        if config.timeout_secs == 0 {
            return Err(FetchError::InvalidTimeout);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            commitment: config.commitment.clone(),
            decode_log: Arc::new(TracingDecodeLog),
        })
    }

    /// Replace the sink that receives per-account decode failures.
    pub fn with_decode_log(mut self, decode_log: Arc<dyn DecodeLog>) -> Self {
        self.decode_log = decode_log;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn commitment(&self) -> &str {
        &self.commitment
    }

    /// Fetch every account of record type `T` owned by `program_id`.
    ///
    /// The scan is narrowed server-side by the account type tag at offset 0
    /// (`discriminator`, or `T::discriminator()` when `None`) and by each of
    /// `filters`. Accounts that fail to decode are omitted from the result.
    pub async fn fetch_typed_accounts<T: AccountRecord>(
        &self,
        program_id: &Address,
        filters: &[MemcmpFilter],
        discriminator: Option<u8>,
    ) -> FetchResult<AccountBatch<T>> {
        let account_type = discriminator.unwrap_or_else(T::discriminator);
        let filter_list = build_filter_list(account_type, filters);

        tracing::debug!(
            program_id = %program_id,
            record = T::NAME,
            account_type = account_type,
            filters = filter_list.len(),
            "Fetching program accounts"
        );

        let entries = self.get_program_accounts(program_id, &filter_list).await?;
        let received = entries.len();
        let accounts = decode_program_accounts::<T>(entries, self.decode_log.as_ref());

        tracing::debug!(
            program_id = %program_id,
            record = T::NAME,
            received = received,
            returned = accounts.len(),
            "Program accounts decoded"
        );

        Ok(accounts)
    }

    /// Fetch accounts matching `filters` without decoding them.
    pub async fn get_raw_program_accounts(
        &self,
        program_id: &Address,
        filters: &[RpcFilter],
    ) -> FetchResult<Vec<RpcKeyedAccount>> {
        let entries = self.get_program_accounts(program_id, filters).await?;
        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry)
                    .map_err(|e| FetchError::MalformedResponse(format!("account entry: {}", e)))
            })
            .collect()
    }

    async fn get_program_accounts(
        &self,
        program_id: &Address,
        filters: &[RpcFilter],
    ) -> FetchResult<Vec<Value>> {
        let start = Instant::now();
        let body = program_accounts_request(program_id, &self.commitment, filters);

        let result = self.send(&body).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_fetch(GET_PROGRAM_ACCOUNTS, outcome, start);

        if let Err(e) = &result {
            tracing::warn!(
                endpoint = %self.endpoint,
                program_id = %program_id,
                error = %e,
                "getProgramAccounts failed"
            );
        }
        result
    }

    async fn send(&self, body: &Value) -> FetchResult<Vec<Value>> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(text),
            });
        }

        let envelope: RpcResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        if let Some(err) = envelope.error {
            return Err(FetchError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        match envelope.result {
            Some(Value::Array(entries)) => Ok(entries),
            // Nodes wrap the list as {context, value} when asked for context.
            Some(Value::Object(mut wrapped)) => match wrapped.remove("value") {
                Some(Value::Array(entries)) => Ok(entries),
                _ => Err(FetchError::MalformedResponse(
                    "result object has no account list".to_string(),
                )),
            },
            Some(_) => Err(FetchError::MalformedResponse(
                "result is not an account list".to_string(),
            )),
            None => Err(FetchError::MalformedResponse("missing result".to_string())),
        }
    }
}

impl std::fmt::Debug for AccountFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountFetcher")
            .field("endpoint", &self.endpoint.as_str())
            .field("commitment", &self.commitment)
            .finish()
    }
}

fn truncate_body(mut body: String) -> String {
    if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

/// Build the JSON-RPC body for a filtered program scan.
pub fn program_accounts_request(
    program_id: &Address,
    commitment: &str,
    filters: &[RpcFilter],
) -> Value {
    let filters: Vec<Value> = filters.iter().map(RpcFilter::to_rpc_json).collect();
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": GET_PROGRAM_ACCOUNTS,
        "params": [
            program_id.to_base58(),
            {
                "commitment": commitment,
                "encoding": ACCOUNT_DATA_ENCODING,
                "filters": filters,
            }
        ]
    })
}

/// Decode raw `getProgramAccounts` entries into records keyed by address.
///
/// Failed entries are reported to `decode_log` and left out. A repeated
/// address keeps the last successfully decoded entry.
pub fn decode_program_accounts<T: AccountRecord>(
    entries: Vec<Value>,
    decode_log: &dyn DecodeLog,
) -> AccountBatch<T> {
    let (accounts, decoded) = decode_batch::<T>(entries, decode_log);
    metrics::record_decoded(T::NAME, decoded);
    accounts
}

/// Returns the batch and the number of entries that decoded, which exceeds
/// the batch size when addresses repeat.
fn decode_batch<T: AccountRecord>(
    entries: Vec<Value>,
    decode_log: &dyn DecodeLog,
) -> (AccountBatch<T>, usize) {
    let mut accounts = AccountBatch::with_capacity(entries.len());
    let mut decoded = 0;

    for entry in entries {
        let pubkey_hint = entry
            .get("pubkey")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        match decode_entry::<T>(entry) {
            Ok(parsed) => {
                decoded += 1;
                accounts.insert(parsed.pubkey.to_base58(), parsed);
            }
            Err(e) => {
                metrics::record_decode_failure(T::NAME);
                decode_log.decode_failed(T::NAME, &pubkey_hint, &e);
            }
        }
    }

    (accounts, decoded)
}

fn decode_entry<T: AccountRecord>(entry: Value) -> Result<ParsedAccount<T>, DecodeError> {
    let mut keyed: RpcKeyedAccount =
        serde_json::from_value(entry).map_err(|e| DecodeError::Entry(e.to_string()))?;
    let pubkey: Address = keyed.pubkey.parse()?;

    let (payload, encoding) = keyed.account.payload()?;
    if encoding != ACCOUNT_DATA_ENCODING {
        return Err(DecodeError::UnsupportedEncoding(encoding.to_string()));
    }
    let bytes = STANDARD.decode(payload)?;
    let info = T::decode(&bytes)?;

    keyed.account.data.clear();

    Ok(ParsedAccount {
        pubkey,
        account: keyed.account,
        info,
    })
}

/// One-shot fetch against `endpoint` with default settings.
pub async fn fetch_typed_accounts<T: AccountRecord>(
    program_id: &Address,
    endpoint: &str,
    filters: &[MemcmpFilter],
    discriminator: Option<u8>,
) -> FetchResult<AccountBatch<T>> {
    let config = RpcConfig {
        endpoint: endpoint.to_string(),
        ..RpcConfig::default()
    };
    AccountFetcher::new(&config)?
        .fetch_typed_accounts(program_id, filters, discriminator)
        .await
}
