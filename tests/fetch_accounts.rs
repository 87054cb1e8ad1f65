//! End-to-end fetch tests against an in-process mock RPC node.

use std::sync::{Arc, Mutex};

use borsh::BorshDeserialize;
use governance_accounts::blockchain::{
    AccountFetcher, AccountRecord, DecodeError, DecodeLog, FetchError, MemcmpFilter, RpcFilter,
    MAX_ERROR_BODY_CHARS,
};
use governance_accounts::config::RpcConfig;
use governance_accounts::governance::{token_owner_records_filters, TokenOwnerRecordHeader};
use governance_accounts::{fetch_typed_accounts, Address};
use serde_json::json;

mod common;

#[derive(Debug, BorshDeserialize)]
struct Config {
    discriminator: u8,
    threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discriminator: 1,
            threshold: 0,
        }
    }
}

impl AccountRecord for Config {
    const NAME: &'static str = "Config";

    fn account_type(&self) -> u8 {
        self.discriminator
    }
}

#[derive(Default)]
struct RecordingLog(Mutex<Vec<String>>);

impl DecodeLog for RecordingLog {
    fn decode_failed(&self, record: &str, pubkey: &str, error: &DecodeError) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} @ {}: {}", record, pubkey, error));
    }
}

fn fetcher(endpoint: &str, log: Arc<RecordingLog>) -> AccountFetcher {
    let config = RpcConfig {
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..RpcConfig::default()
    };
    AccountFetcher::new(&config).unwrap().with_decode_log(log)
}

fn config_payload(threshold: u32) -> Vec<u8> {
    let mut data = vec![1u8];
    data.extend_from_slice(&threshold.to_le_bytes());
    data
}

#[tokio::test]
async fn test_single_config_account() {
    let program = Address::new([1u8; 32]);
    let account = Address::new([2u8; 32]);
    let entries = vec![common::account_entry(&account, &config_payload(42))];
    let (url, captured) = common::start_mock_node(200, common::rpc_result(entries)).await;

    let log = Arc::new(RecordingLog::default());
    let accounts = fetcher(&url, log.clone())
        .fetch_typed_accounts::<Config>(&program, &[], None)
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    let parsed = &accounts[&account.to_base58()];
    assert_eq!(parsed.pubkey, account);
    assert_eq!(parsed.info.threshold, 42);
    assert!(parsed.account.data.is_empty());
    assert_eq!(parsed.account.lamports, 2_039_280);
    assert!(log.0.lock().unwrap().is_empty());

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "getProgramAccounts");
    assert_eq!(request["params"][0], program.to_base58());
    assert_eq!(request["params"][1]["commitment"], "recent");
    assert_eq!(request["params"][1]["encoding"], "base64");
    assert_eq!(
        request["params"][1]["filters"],
        json!([{ "memcmp": { "offset": 0, "bytes": "2" } }])
    );
}

#[tokio::test]
async fn test_truncated_payload_is_skipped_and_logged() {
    let program = Address::new([1u8; 32]);
    let account = Address::new([2u8; 32]);
    let entries = vec![common::account_entry(&account, &[1])];
    let (url, _) = common::start_mock_node(200, common::rpc_result(entries)).await;

    let log = Arc::new(RecordingLog::default());
    let accounts = fetcher(&url, log.clone())
        .fetch_typed_accounts::<Config>(&program, &[], None)
        .await
        .unwrap();

    assert!(accounts.is_empty());
    let failures = log.0.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with(&format!("Config @ {}", account.to_base58())));
}

#[tokio::test]
async fn test_partial_batch_keeps_valid_entries() {
    let program = Address::new([1u8; 32]);
    let valid: Vec<Address> = (10u8..15).map(|b| Address::new([b; 32])).collect();
    let corrupt: Vec<Address> = (20u8..23).map(|b| Address::new([b; 32])).collect();

    // corrupt entries interleaved with valid ones
    let mut entries = Vec::new();
    for (i, addr) in valid.iter().enumerate() {
        entries.push(common::account_entry(addr, &config_payload(i as u32)));
        if let Some(bad) = corrupt.get(i) {
            let mut entry = common::account_entry(bad, &[]);
            entry["account"]["data"][0] = json!("%%% not base64 %%%");
            entries.push(entry);
        }
    }

    let (url, _) = common::start_mock_node(200, common::rpc_result(entries)).await;
    let log = Arc::new(RecordingLog::default());
    let accounts = fetcher(&url, log.clone())
        .fetch_typed_accounts::<Config>(&program, &[], None)
        .await
        .unwrap();

    assert_eq!(accounts.len(), valid.len());
    for addr in &valid {
        assert!(accounts.contains_key(&addr.to_base58()));
    }
    assert_eq!(log.0.lock().unwrap().len(), corrupt.len());
}

#[tokio::test]
async fn test_duplicate_addresses_collapse() {
    let program = Address::new([1u8; 32]);
    let account = Address::new([2u8; 32]);
    let entries = vec![
        common::account_entry(&account, &config_payload(1)),
        common::account_entry(&account, &config_payload(2)),
    ];
    let (url, _) = common::start_mock_node(200, common::rpc_result(entries)).await;

    let accounts = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&program, &[], None)
        .await
        .unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[&account.to_base58()].info.threshold, 2);
}

#[tokio::test]
async fn test_explicit_discriminator_and_caller_filters() {
    let program = Address::new([1u8; 32]);
    let (url, captured) = common::start_mock_node(200, common::rpc_result(vec![])).await;
    let filter = MemcmpFilter::new(5, vec![1, 2, 3]).unwrap();

    let accounts = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&program, &[filter], Some(9))
        .await
        .unwrap();
    assert!(accounts.is_empty());

    let requests = captured.lock().unwrap();
    assert_eq!(
        requests[0]["params"][1]["filters"],
        json!([
            { "memcmp": { "offset": 0, "bytes": "A" } },
            { "memcmp": { "offset": 5, "bytes": "Ldp" } }
        ])
    );
}

#[tokio::test]
async fn test_rpc_error_fails_the_call() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": -32602, "message": "Invalid param: not a program" }
    })
    .to_string();
    let (url, _) = common::start_mock_node(200, body).await;

    let err = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&Address::default(), &[], None)
        .await
        .unwrap_err();

    match err {
        FetchError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert!(message.contains("not a program"));
        }
        other => panic!("expected RPC error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_fails_the_call() {
    let (url, _) = common::start_mock_node(503, "busy".to_string()).await;

    let err = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&Address::default(), &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_large_error_body_is_bounded() {
    let page = "<html>".repeat(10_000);
    let (url, _) = common::start_mock_node(500, page).await;

    let err = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&Address::default(), &[], None)
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body.len(), MAX_ERROR_BODY_CHARS + 3);
            assert!(body.starts_with("<html>"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_zero_timeout_is_refused() {
    let config = RpcConfig {
        endpoint: "http://127.0.0.1:1".to_string(),
        timeout_secs: 0,
        ..RpcConfig::default()
    };
    let err = AccountFetcher::new(&config).unwrap_err();
    assert!(matches!(err, FetchError::InvalidTimeout));
}

#[tokio::test]
async fn test_malformed_json_fails_the_call() {
    let (url, _) = common::start_mock_node(200, "not json".to_string()).await;

    let err = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&Address::default(), &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_connection_refused_fails_the_call() {
    let url = common::closed_endpoint().await;

    let err = fetch_typed_accounts::<Config>(&Address::default(), &url, &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(_)));
}

#[tokio::test]
async fn test_context_wrapped_result() {
    let account = Address::new([2u8; 32]);
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "context": { "slot": 1234 },
            "value": [common::account_entry(&account, &config_payload(7))]
        }
    })
    .to_string();
    let (url, _) = common::start_mock_node(200, body).await;

    let accounts = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<Config>(&Address::default(), &[], None)
        .await
        .unwrap();

    assert_eq!(accounts[&account.to_base58()].info.threshold, 7);
}

#[tokio::test]
async fn test_token_owner_records_scan() {
    let program = Address::new([1u8; 32]);
    let realm = Address::new([3u8; 32]);
    let owner = Address::new([4u8; 32]);
    let record = Address::new([5u8; 32]);

    let mut payload = vec![2u8];
    payload.extend_from_slice(realm.as_bytes());
    payload.extend_from_slice(&[6u8; 32]);
    payload.extend_from_slice(owner.as_bytes());
    payload.extend_from_slice(&1_000u64.to_le_bytes());
    payload.extend_from_slice(&[0u8; 24]);

    let entries = vec![common::account_entry(&record, &payload)];
    let (url, captured) = common::start_mock_node(200, common::rpc_result(entries)).await;

    let filters = token_owner_records_filters(Some(&realm), None, Some(&owner));
    let accounts = fetcher(&url, Arc::new(RecordingLog::default()))
        .fetch_typed_accounts::<TokenOwnerRecordHeader>(&program, &filters, None)
        .await
        .unwrap();

    let parsed = &accounts[&record.to_base58()];
    assert_eq!(parsed.info.realm, realm);
    assert_eq!(parsed.info.governing_token_owner, owner);
    assert_eq!(parsed.info.governing_token_deposit_amount, 1_000);

    let requests = captured.lock().unwrap();
    let sent = &requests[0]["params"][1]["filters"];
    assert_eq!(sent[0]["memcmp"]["bytes"], "3");
    assert_eq!(sent[1]["memcmp"]["offset"], 1);
    assert_eq!(sent[1]["memcmp"]["bytes"], realm.to_base58());
    assert_eq!(sent[2]["memcmp"]["offset"], 65);
    assert_eq!(sent[2]["memcmp"]["bytes"], owner.to_base58());
}

#[tokio::test]
async fn test_raw_scan_returns_undecoded_entries() {
    let account = Address::new([2u8; 32]);
    let entries = vec![common::account_entry(&account, &[14, 1, 2])];
    let (url, _) = common::start_mock_node(200, common::rpc_result(entries)).await;

    let raw = fetcher(&url, Arc::new(RecordingLog::default()))
        .get_raw_program_accounts(&Address::default(), &[RpcFilter::AccountType(14)])
        .await
        .unwrap();

    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].pubkey, account.to_base58());
    assert_eq!(raw[0].account.payload().unwrap(), ("DgEC", "base64"));
}
