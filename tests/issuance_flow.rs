//! End-to-end issuance runs against an in-memory ledger and a mocked Horizon.

use std::sync::Mutex;

use async_trait::async_trait;
use stellar_issuer::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Helpers
// ============================================================================

fn seed(byte: u8) -> String {
    stellar_strkey::ed25519::PrivateKey([byte; 32]).to_string()
}

fn address(byte: u8) -> AccountId {
    SigningIdentity::from_secret_bytes([byte; 32]).account_id()
}

/// Ledger double: serves a fixed sequence number and records submissions.
struct MemoryLedger {
    sequence: Option<i64>,
    rejection: Option<String>,
    lookups: Mutex<u32>,
    submitted: Mutex<Vec<SignedEnvelope>>,
}

impl MemoryLedger {
    fn new(sequence: i64) -> Self {
        Self {
            sequence: Some(sequence),
            rejection: None,
            lookups: Mutex::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn missing_account() -> Self {
        Self {
            sequence: None,
            ..Self::new(0)
        }
    }

    fn rejecting(reason: &str) -> Self {
        Self {
            rejection: Some(reason.to_string()),
            ..Self::new(7)
        }
    }

    fn submitted(&self) -> Vec<SignedEnvelope> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountService for MemoryLedger {
    async fn sequence_number(&self, account: &AccountId) -> IssueResult<i64> {
        *self.lookups.lock().unwrap() += 1;
        self.sequence
            .ok_or_else(|| IssueError::AccountNotFound(account.address()))
    }
}

#[async_trait]
impl SubmissionService for MemoryLedger {
    async fn submit(&self, envelope: &SignedEnvelope) -> IssueResult<SubmissionReceipt> {
        self.submitted.lock().unwrap().push(envelope.clone());
        match &self.rejection {
            Some(reason) => Err(IssueError::Rejected(reason.clone())),
            None => Ok(SubmissionReceipt {
                hash: envelope.hash_hex(),
                ledger: Some(1),
            }),
        }
    }
}

fn keys(receivers: &[String]) -> IssuanceKeys {
    IssuanceKeys::resolve(&seed(1), &seed(2), receivers).unwrap()
}

// ============================================================================
// In-memory ledger
// ============================================================================

#[tokio::test]
async fn issues_with_no_extra_receivers() {
    let ledger = MemoryLedger::new(41);
    let network = NetworkConfig::testnet();
    let receivers = split_receiver_list(",");

    let issued = issue_asset(&ledger, &network, &IssuanceSettings::default(), keys(&receivers))
        .await
        .unwrap();

    assert_eq!(issued.asset.to_string(), format!("EigerNFT:{}", address(1)));

    let submitted = ledger.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = submitted[0].transaction();
    assert_eq!(tx.operations.len(), 4);
    assert_eq!(submitted[0].signatures().len(), 2);
    assert_eq!(tx.sequence, 42);
    assert_eq!(tx.fee, 400);
    assert_eq!(tx.source, address(1));
    assert_eq!(issued.receipt.hash, submitted[0].hash_hex());
}

#[tokio::test]
async fn issues_with_two_extra_receivers() {
    let ledger = MemoryLedger::new(9);
    let network = NetworkConfig::testnet();
    let receivers = split_receiver_list(&format!("{},{}", seed(10), seed(11)));

    issue_asset(&ledger, &network, &IssuanceSettings::default(), keys(&receivers))
        .await
        .unwrap();

    let envelope = &ledger.submitted()[0];
    let ops = &envelope.transaction().operations;
    assert_eq!(ops.len(), 6);
    assert_eq!(envelope.signatures().len(), 4);
    assert_eq!(ops[4].source, Some(address(10)));
    assert_eq!(ops[5].source, Some(address(11)));

    let hints: Vec<[u8; 4]> = envelope.signatures().iter().map(|s| s.hint.0).collect();
    let expected: Vec<[u8; 4]> = [1, 2, 10, 11]
        .iter()
        .map(|b| address(*b).signature_hint())
        .collect();
    assert_eq!(hints, expected);
}

#[tokio::test]
async fn submitted_envelope_decodes_as_stellar_xdr() {
    use base64::Engine as _;
    use stellar_xdr::curr::{self as xdr, Limits, ReadXdr};

    let ledger = MemoryLedger::new(41);
    let receivers = vec![seed(10)];

    issue_asset(
        &ledger,
        &NetworkConfig::testnet(),
        &IssuanceSettings::default(),
        keys(&receivers),
    )
    .await
    .unwrap();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(ledger.submitted()[0].to_base64())
        .unwrap();
    let envelope = match xdr::TransactionEnvelope::from_xdr(bytes, Limits::none()).unwrap() {
        xdr::TransactionEnvelope::Tx(v1) => v1,
        other => panic!("expected a v1 envelope, got {:?}", other),
    };

    let muxed = |b: u8| xdr::MuxedAccount::Ed25519(xdr::Uint256(*address(b).as_bytes()));
    assert_eq!(envelope.tx.source_account, muxed(1));
    assert_eq!(envelope.tx.seq_num.0, 42);
    assert_eq!(envelope.tx.fee, 500);
    assert_eq!(envelope.signatures.len(), 3);

    let kinds: Vec<&str> = envelope
        .tx
        .operations
        .iter()
        .map(|op| match &op.body {
            xdr::OperationBody::ChangeTrust(_) => "change_trust",
            xdr::OperationBody::Payment(_) => "payment",
            xdr::OperationBody::ManageData(_) => "manage_data",
            xdr::OperationBody::SetOptions(set) if set.master_weight == Some(0) => "revoke",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["change_trust", "payment", "manage_data", "revoke", "change_trust"]
    );

    let sources: Vec<_> = envelope
        .tx
        .operations
        .iter()
        .map(|op| op.source_account.clone())
        .collect();
    assert_eq!(
        sources,
        vec![
            Some(muxed(2)),
            Some(muxed(1)),
            Some(muxed(1)),
            Some(muxed(1)),
            Some(muxed(10)),
        ]
    );
}

#[tokio::test]
async fn emitted_line_recovers_code_and_issuer() {
    let ledger = MemoryLedger::new(1);
    let settings = IssuanceSettings::default().with_asset_code("ART42");

    let issued = issue_asset(&ledger, &NetworkConfig::testnet(), &settings, keys(&[]))
        .await
        .unwrap();

    let line = issued.asset.to_string();
    let (code, issuer) = line.split_once(':').unwrap();
    assert_eq!(code, "ART42");
    assert_eq!(issuer.parse::<AccountId>().unwrap(), address(1));
}

#[tokio::test]
async fn rejection_halts_the_run() {
    let ledger = MemoryLedger::rejecting("tx_failed: op_success, op_no_trust");

    let result = issue_asset(
        &ledger,
        &NetworkConfig::testnet(),
        &IssuanceSettings::default(),
        keys(&[]),
    )
    .await;

    match result {
        Err(IssueError::Rejected(reason)) => assert!(reason.contains("op_no_trust")),
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(ledger.submitted().len(), 1);
}

#[tokio::test]
async fn missing_issuer_account_never_submits() {
    let ledger = MemoryLedger::missing_account();

    let result = issue_asset(
        &ledger,
        &NetworkConfig::testnet(),
        &IssuanceSettings::default(),
        keys(&[]),
    )
    .await;

    assert!(matches!(result, Err(IssueError::AccountNotFound(_))));
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn invalid_settings_fail_before_any_lookup() {
    let ledger = MemoryLedger::new(1);
    let settings = IssuanceSettings::default().with_asset_code("NOT VALID");

    let result = issue_asset(&ledger, &NetworkConfig::testnet(), &settings, keys(&[])).await;

    assert!(matches!(result, Err(IssueError::InvalidAsset(_))));
    assert_eq!(*ledger.lookups.lock().unwrap(), 0);
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn issuer_reused_as_receiver_is_rejected_up_front() {
    let result = IssuanceKeys::resolve(&seed(1), &seed(2), &[seed(1)]);
    assert!(matches!(result, Err(IssueError::DuplicateIdentity { .. })));
}

#[tokio::test]
async fn malformed_receiver_seed_is_rejected_up_front() {
    let result = IssuanceKeys::resolve(&seed(1), &seed(2), &[seed(3), "SEEDX".to_string()]);
    assert!(matches!(result, Err(IssueError::InvalidSeedFormat(_))));
}

#[tokio::test]
async fn prepare_signs_without_submitting() {
    let ledger = MemoryLedger::new(5);
    let settings = IssuanceSettings::default()
        .with_base_fee(200)
        .with_timeout_secs(30);

    let prepared = prepare_issuance(&ledger, &NetworkConfig::testnet(), &settings, keys(&[]))
        .await
        .unwrap();

    let tx = prepared.envelope.transaction();
    assert_eq!(tx.fee, 800);
    assert!(tx.time_bounds.max_time > 0);
    assert_eq!(*ledger.lookups.lock().unwrap(), 1);
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn signatures_are_bound_to_the_network() {
    let ledger = MemoryLedger::new(5);
    let settings = IssuanceSettings::default();

    let testnet = prepare_issuance(&ledger, &NetworkConfig::testnet(), &settings, keys(&[]))
        .await
        .unwrap();
    let public = prepare_issuance(&ledger, &NetworkConfig::public(), &settings, keys(&[]))
        .await
        .unwrap();

    assert_ne!(testnet.envelope.hash(), public.envelope.hash());
    assert_eq!(testnet.envelope.transaction(), public.envelope.transaction());
}

// ============================================================================
// Mocked Horizon
// ============================================================================

#[tokio::test]
async fn issues_against_horizon() {
    let server = MockServer::start().await;
    let issuer = address(1);

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "account_id": issuer.address(),
            "sequence": "123456789"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hash": "ab".repeat(32),
            "ledger": 77,
            "successful": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let network = NetworkConfig::testnet().with_horizon_url(server.uri());
    let horizon = HorizonClient::new(&network.horizon_url).unwrap();

    let issued = issue_asset(&horizon, &network, &IssuanceSettings::default(), keys(&[seed(10)]))
        .await
        .unwrap();

    assert_eq!(issued.asset.to_string(), format!("EigerNFT:{}", issuer));
    assert_eq!(issued.receipt.ledger, Some(77));
}

#[tokio::test]
async fn horizon_rejection_reports_result_codes() {
    let server = MockServer::start().await;
    let issuer = address(1);

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", issuer)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "account_id": issuer.address(),
            "sequence": "10"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "title": "Transaction Failed",
            "status": 400,
            "extras": {"result_codes": {"transaction": "tx_bad_seq"}}
        })))
        .mount(&server)
        .await;

    let network = NetworkConfig::testnet().with_horizon_url(server.uri());
    let horizon = HorizonClient::new(&network.horizon_url).unwrap();

    let err = issue_asset(&horizon, &network, &IssuanceSettings::default(), keys(&[]))
        .await
        .unwrap_err();
    match err {
        IssueError::Rejected(reason) => assert_eq!(reason, "tx_bad_seq"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}
