//! End-to-end tests for the PerfectMoney callback pipeline.
//!
//! These tests drive the public API with the in-memory adapters:
//! 1. The five canonical notification scenarios
//! 2. Duplicate delivery (pipeline vs. ledger responsibilities)
//! 3. Numeric policy behaviour

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use perfectmoney_callback::adapters::memory::{
    InMemoryCallbackLog, InMemoryPaymentLedger, InMemoryPurchaseLedger,
};
use perfectmoney_callback::application::handlers::payment::{
    CreditStatus, HandlePaymentCallbackCommand, HandlePaymentCallbackHandler,
};
use perfectmoney_callback::domain::foundation::RequestKey;
use perfectmoney_callback::domain::payment::hash_verifier::{self, HashFields};
use perfectmoney_callback::domain::payment::notification::fields;
use perfectmoney_callback::domain::payment::{
    CallbackPipeline, CallbackRejection, Cost, CurrencyCode, InboundNotification, LogType,
    NumericPolicy, ParsedNotification, PaymentProfile, PaymentResult, PerfectMoney,
    PerfectMoneySettings, ProviderConfig, ProviderOptions, PurchaseRequest, PROVIDER_ID,
};
use perfectmoney_callback::ports::CallbackLogRepository;

const SECRET: &str = "e2e-alternate-passphrase";
const GATEWAY_IP: &str = "77.109.141.170";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn provider_config() -> ProviderConfig {
    ProviderConfig::from_options(
        ProviderOptions::new()
            .with("payee_account", "U9000001")
            .with("payee_name", "E2E Shop")
            .with("alternate_passphrase", SECRET),
    )
    .unwrap()
}

async fn purchases() -> Arc<InMemoryPurchaseLedger> {
    let ledger = Arc::new(InMemoryPurchaseLedger::new());
    ledger
        .insert(PurchaseRequest::new(
            RequestKey::new("pr-100").unwrap(),
            Cost::new(
                Decimal::from_str("10.00").unwrap(),
                CurrencyCode::new("USD").unwrap(),
            )
            .unwrap(),
            PaymentProfile::new(PROVIDER_ID, "Perfect Money", provider_config()),
        ))
        .await;
    ledger
}

/// Signed notification fields for `pr-100`, with overrides applied after
/// signing.
fn signed_fields(signed: &[(&str, &str)], after: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = vec![
        (fields::PAYEE_ACCOUNT.to_string(), "U9000001".to_string()),
        (fields::PAYMENT_ID.to_string(), "pr-100".to_string()),
        (fields::PAYMENT_AMOUNT.to_string(), "10.00".to_string()),
        (fields::PAYMENT_UNITS.to_string(), "USD".to_string()),
        (fields::PAYMENT_BATCH_NUM.to_string(), "555001".to_string()),
        (fields::PAYER_ACCOUNT.to_string(), "U1111111".to_string()),
        (fields::TIMESTAMPGMT.to_string(), "1718000000".to_string()),
    ];
    apply(&mut pairs, signed);

    let parsed = ParsedNotification::parse(&InboundNotification::new(pairs.clone(), None));
    let hash = hash_verifier::compute_digest(&HashFields::from_notification(&parsed), SECRET);
    pairs.push((fields::V2_HASH.to_string(), hash));

    apply(&mut pairs, after);
    pairs
}

fn apply(pairs: &mut Vec<(String, String)>, overrides: &[(&str, &str)]) {
    for (name, value) in overrides {
        match pairs.iter_mut().find(|(k, _)| k == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => pairs.push((name.to_string(), value.to_string())),
        }
    }
}

fn notification(pairs: Vec<(String, String)>, source: &str) -> InboundNotification {
    InboundNotification::new(pairs, Some(source.to_string()))
}

async fn pipeline() -> CallbackPipeline<PerfectMoney> {
    CallbackPipeline::new(PerfectMoney::default(), purchases().await)
}

/// One character of an uppercase hex digest, swapped for another.
fn tamper(hash: &str) -> String {
    let mut chars: Vec<char> = hash.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

// =============================================================================
// Canonical Scenarios
// =============================================================================

#[tokio::test]
async fn matching_notification_from_gateway_is_received() {
    let outcome = pipeline()
        .await
        .process(notification(signed_fields(&[], &[]), GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Received);
    assert_eq!(outcome.log_type, LogType::Info);
    assert_eq!(outcome.transaction_id, "555001");
    assert!(outcome.rejection.is_none());
}

#[tokio::test]
async fn hash_altered_by_one_character_is_rejected() {
    let pairs = signed_fields(&[], &[]);
    let hash = pairs
        .iter()
        .find(|(k, _)| k == fields::V2_HASH)
        .map(|(_, v)| v.clone())
        .unwrap();
    let tampered = tamper(&hash);
    let pairs = signed_fields(&[], &[(fields::V2_HASH, tampered.as_str())]);

    let outcome = pipeline()
        .await
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Rejected);
    assert_eq!(outcome.log_type, LogType::Error);
    assert_eq!(outcome.rejection, Some(CallbackRejection::HashMismatch));
}

#[tokio::test]
async fn notification_from_unknown_host_is_rejected() {
    let outcome = pipeline()
        .await
        .process(notification(signed_fields(&[], &[]), "77.109.141.171"))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Rejected);
    assert_eq!(
        outcome.rejection,
        Some(CallbackRejection::DisallowedOrigin("77.109.141.171".to_string()))
    );
}

#[tokio::test]
async fn empty_batch_number_is_ignored_with_info_severity() {
    let pairs = signed_fields(&[(fields::PAYMENT_BATCH_NUM, "")], &[]);

    let outcome = pipeline()
        .await
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Ignored);
    assert_eq!(outcome.log_type, LogType::Info);
    assert_eq!(outcome.rejection, Some(CallbackRejection::NoTransactionId));
}

#[tokio::test]
async fn short_payment_is_rejected_as_cost_mismatch() {
    let pairs = signed_fields(&[(fields::PAYMENT_AMOUNT, "9.99")], &[]);

    let outcome = pipeline()
        .await
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Rejected);
    assert_eq!(outcome.log_type, LogType::Error);
    assert_eq!(outcome.rejection, Some(CallbackRejection::CostMismatch));
}

#[tokio::test]
async fn wrong_currency_is_rejected_as_cost_mismatch() {
    let pairs = signed_fields(&[(fields::PAYMENT_UNITS, "EUR")], &[]);

    let outcome = pipeline()
        .await
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.rejection, Some(CallbackRejection::CostMismatch));
}

// =============================================================================
// Duplicate Delivery
// =============================================================================

#[tokio::test]
async fn pipeline_alone_receives_duplicate_delivery_twice() {
    let pipeline = pipeline().await;
    let pairs = signed_fields(&[], &[]);

    let first = pipeline
        .process(notification(pairs.clone(), GATEWAY_IP))
        .await
        .unwrap();
    let second = pipeline
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(first.payment_result, PaymentResult::Received);
    assert_eq!(second.payment_result, PaymentResult::Received);
}

#[tokio::test]
async fn ledger_credits_duplicate_delivery_once() {
    let payments = Arc::new(InMemoryPaymentLedger::new());
    let log = Arc::new(InMemoryCallbackLog::new());
    let handler = HandlePaymentCallbackHandler::new(
        Arc::new(pipeline().await),
        payments.clone(),
        log.clone(),
    );
    let command = || HandlePaymentCallbackCommand {
        fields: signed_fields(&[], &[]),
        source_address: Some(GATEWAY_IP.to_string()),
    };

    let first = handler.handle(command()).await.unwrap();
    let second = handler.handle(command()).await.unwrap();

    assert_eq!(first.credit, CreditStatus::Credited);
    assert_eq!(second.credit, CreditStatus::AlreadyCredited);
    assert_eq!(payments.len().await, 1);

    let entries = log
        .find_by_request_key(&RequestKey::new("pr-100").unwrap())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|e| e.payment_result == PaymentResult::Received));
}

// =============================================================================
// Numeric Policy
// =============================================================================

#[tokio::test]
async fn malformed_amount_is_rejected_under_default_policy() {
    let pairs = signed_fields(&[], &[(fields::PAYMENT_AMOUNT, "ten")]);

    let outcome = pipeline()
        .await
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Rejected);
    assert_eq!(
        outcome.rejection,
        Some(CallbackRejection::MalformedField(fields::PAYMENT_AMOUNT))
    );
}

#[tokio::test]
async fn malformed_amount_is_coerced_and_then_fails_the_hash() {
    let gateway = PerfectMoney::new(PerfectMoneySettings {
        numeric_policy: NumericPolicy::Coerce,
        ..Default::default()
    });
    let pipeline = CallbackPipeline::new(gateway, purchases().await);
    let pairs = signed_fields(&[], &[(fields::PAYMENT_AMOUNT, "ten")]);

    let outcome = pipeline
        .process(notification(pairs, GATEWAY_IP))
        .await
        .unwrap();

    assert_eq!(outcome.payment_result, PaymentResult::Rejected);
    assert_eq!(outcome.rejection, Some(CallbackRejection::HashMismatch));
}
