//! Mint validation, quota and payment.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::TestHarness;
use alloy::primitives::{Address, I256, U256};
use castmint::{Error, MintRequest, ServiceEvent, TokenId};
use std::str::FromStr;
use std::sync::atomic::Ordering;

const CAST: &str = "0x71d5225f77e0164388b1d4c120825f3a2c1f131c";
const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn qty(n: i64) -> I256 {
    I256::try_from(n).expect("quantity fits")
}

fn recipient() -> Address {
    Address::from_str(RECIPIENT).expect("valid address")
}

/// Harness with `CAST` registered and `count` units already minted.
fn harness_with_minted(count: u64) -> (TestHarness, TokenId) {
    let harness = TestHarness::setup();
    let token_id = harness.chain.register(CAST);
    harness.chain.set_mint_count(token_id, U256::from(count));
    (harness, token_id)
}

#[tokio::test]
async fn test_non_positive_quantity_rejected_before_io() {
    let (harness, token_id) = harness_with_minted(0);

    for quantity in [qty(0), qty(-1), I256::MIN] {
        let result = harness
            .service
            .mint(&MintRequest::new(RECIPIENT, token_id, quantity))
            .await;
        let err = result.expect_err("non-positive quantity");
        assert!(matches!(err, Error::InvalidQuantity(_)), "{quantity}");
        assert!(err.is_input_error());
    }
    assert_eq!(harness.chain.calls.total(), 0);
}

#[tokio::test]
async fn test_quantity_checked_before_address() {
    let (harness, token_id) = harness_with_minted(0);

    let result = harness
        .service
        .mint(&MintRequest::new("not-an-address", token_id, qty(0)))
        .await;
    assert!(matches!(result, Err(Error::InvalidQuantity(_))));
}

#[tokio::test]
async fn test_invalid_address_rejected_before_io() {
    let (harness, token_id) = harness_with_minted(0);

    for address in [
        "not-an-address",
        "0x1234",
        "0x70997970c51812dc3a010c7d01b50e0d17dc79cZ",
        // Mixed case with a broken checksum
        "0x70997970C51812DC3A010C7d01b50e0d17dc79C8",
    ] {
        let result = harness
            .service
            .mint(&MintRequest::new(address, token_id, qty(1)))
            .await;
        assert!(
            matches!(result, Err(Error::InvalidAddress(ref a)) if a == address),
            "{address}"
        );
    }
    assert_eq!(harness.chain.calls.total(), 0);
}

#[tokio::test]
async fn test_mint_over_limit_is_rejected() {
    let (harness, token_id) = harness_with_minted(95);

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(10)))
        .await;

    match result {
        Err(Error::MintLimitExceeded {
            current,
            requested,
            limit,
        }) => {
            assert_eq!(current, "95");
            assert_eq!(requested, "10");
            assert_eq!(limit, "100");
        }
        other => panic!("expected MintLimitExceeded, got {other:?}"),
    }
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 0);
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(95)));
}

#[tokio::test]
async fn test_mint_up_to_limit_pays_exact_price() {
    let (harness, token_id) = harness_with_minted(95);

    let receipt = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(5)))
        .await
        .unwrap()
        .expect("receipt returned");

    assert_eq!(
        harness.chain.submitted_mints(),
        vec![super::harness::SubmittedMint {
            to: recipient(),
            token_id,
            quantity: U256::from(5),
            value: U256::from(500),
        }]
    );
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(100)));
    assert!(receipt.block_number.is_some());
}

#[tokio::test]
async fn test_lowercase_recipient_accepted() {
    let (harness, token_id) = harness_with_minted(0);

    harness
        .service
        .mint(&MintRequest::new(
            RECIPIENT.to_lowercase(),
            token_id,
            qty(1),
        ))
        .await
        .unwrap();
    assert_eq!(harness.chain.submitted_mints()[0].to, recipient());
}

#[tokio::test]
async fn test_missing_price_or_limit_is_not_initialized() {
    let (harness, token_id) = harness_with_minted(0);
    harness.chain.set_mint_price(None);

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
        .await;
    assert!(matches!(result, Err(Error::NotInitialized)));

    let (harness, token_id) = harness_with_minted(0);
    harness.chain.set_max_mint_limit(None);

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
        .await;
    assert!(matches!(result, Err(Error::NotInitialized)));
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let harness = TestHarness::setup();
    let token_id = TokenId::from(42_u64);

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
        .await;

    assert!(matches!(result, Err(Error::TokenNotFound(ref id)) if id == "42"));
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_submission_is_mint_failed() {
    let (harness, token_id) = harness_with_minted(0);
    harness.chain.set_fail_submissions(true);

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
        .await;
    assert!(matches!(result, Err(Error::MintFailed)));
    assert_eq!(harness.chain.calls.wait.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reverted_mint_is_mint_failed() {
    let (harness, token_id) = harness_with_minted(0);
    harness.chain.revert_next();

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
        .await;
    assert!(matches!(result, Err(Error::MintFailed)));
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::ZERO));
}

#[tokio::test]
async fn test_receiptless_mint_is_success() {
    let (harness, token_id) = harness_with_minted(0);
    harness.chain.set_receiptless(true);

    let receipt = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(3)))
        .await
        .unwrap();

    assert!(receipt.is_none());
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(3)));
}

#[tokio::test]
async fn test_payment_is_exact_for_large_prices() {
    let (harness, token_id) = harness_with_minted(0);
    // 1e30 wei does not fit in a u64 or an f64 mantissa
    let price = U256::from(10).pow(U256::from(30)) + U256::from(7);
    harness.chain.set_mint_price(Some(price));

    harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(3)))
        .await
        .unwrap();

    let mint = &harness.chain.submitted_mints()[0];
    assert_eq!(mint.value, price * U256::from(3));
    assert_eq!(
        mint.value.to_string(),
        "3000000000000000000000000000021"
    );
}

#[tokio::test]
async fn test_payment_overflow_is_mint_failed() {
    let (harness, token_id) = harness_with_minted(0);
    harness.chain.set_mint_price(Some(U256::MAX));

    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(2)))
        .await;
    assert!(matches!(result, Err(Error::MintFailed)));
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_price_and_limit_read_once() {
    let (harness, token_id) = harness_with_minted(0);

    for _ in 0..3 {
        harness
            .service
            .mint(&MintRequest::new(RECIPIENT, token_id, qty(1)))
            .await
            .unwrap();
    }

    assert_eq!(harness.chain.calls.price.load(Ordering::SeqCst), 1);
    assert_eq!(harness.chain.calls.limit.load(Ordering::SeqCst), 1);
    assert_eq!(harness.chain.calls.count.load(Ordering::SeqCst), 1);
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(3)));
}

#[tokio::test]
async fn test_stale_count_defers_to_contract() {
    let (harness, token_id) = harness_with_minted(95);

    harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(5)))
        .await
        .unwrap();

    // Cached count still says 95, so the check passes and the contract reverts
    let result = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(5)))
        .await;

    assert!(matches!(result, Err(Error::MintFailed)));
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 2);
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(100)));
}

#[tokio::test]
async fn test_cached_reads_exposed_on_service() {
    let (harness, token_id) = harness_with_minted(12);

    assert_eq!(harness.service.mint_price().await.unwrap(), U256::from(100));
    assert_eq!(harness.service.max_mint_limit().await.unwrap(), U256::from(100));
    assert_eq!(
        harness.service.token_mint_count(token_id).await.unwrap(),
        U256::from(12)
    );
    assert_eq!(harness.cached("mintPrice").await.as_deref(), Some("100"));
    assert_eq!(
        harness
            .cached(&format!("tokenMintCount:{token_id}"))
            .await
            .as_deref(),
        Some("12")
    );

    let stats = harness.service.cache_stats();
    assert!(stats.is_none(), "harness supplies its own cache");
}

#[tokio::test]
async fn test_mint_emits_event() {
    let (harness, token_id) = harness_with_minted(0);
    let mut events = harness.service.subscribe_events();

    let receipt = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(2)))
        .await
        .unwrap()
        .expect("receipt returned");

    assert_eq!(
        events.try_recv().unwrap(),
        ServiceEvent::Minted {
            token_id,
            recipient: recipient(),
            quantity: U256::from(2),
            tx_hash: Some(receipt.transaction_hash),
        }
    );
}

#[tokio::test]
async fn test_failed_mint_emits_nothing() {
    let (harness, token_id) = harness_with_minted(0);
    let mut events = harness.service.subscribe_events();
    harness.chain.revert_next();

    let _ = harness
        .service
        .mint(&MintRequest::new(RECIPIENT, token_id, qty(2)))
        .await;
    assert!(events.try_recv().is_err());
}
