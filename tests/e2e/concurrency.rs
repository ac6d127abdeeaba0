//! Concurrent callers racing on the same content id or token.
//!
//! Nothing in the service serializes these; the contract is what keeps the
//! chain consistent. These tests pin down what callers observe.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::harness::derive_token_id;
use super::TestHarness;
use alloy::primitives::{I256, U256};
use castmint::{ContentId, Error, MintRequest};
use futures::future::join_all;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const CAST: &str = "0x71d5225f77e0164388b1d4c120825f3a2c1f131c";
const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

#[tokio::test]
async fn test_concurrent_first_resolution_registers_once() {
    let harness = TestHarness::setup();
    let content_id = ContentId::new(CAST);

    let results = join_all((0..8).map(|_| harness.service.resolve_token_id(&content_id))).await;

    let expected = derive_token_id(CAST);
    let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert!(!ok.is_empty());
    assert!(ok.iter().all(|id| **id == expected));

    // Losers of the race saw their generation revert
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, Error::ChainTransactionFailed), "{e}");
        }
    }
    assert_eq!(harness.chain.registered_count(), 1);

    // Once the dust settles every caller converges on the same id
    let settled = harness.service.resolve_token_id(&content_id).await.unwrap();
    assert_eq!(settled, expected);
}

#[tokio::test]
async fn test_concurrent_resolution_of_distinct_content() {
    let harness = TestHarness::setup();
    let ids: Vec<ContentId> = (0..16)
        .map(|i| ContentId::new(format!("https://warpcast.com/alice/0x{i:08x}")))
        .collect();

    let results = join_all(ids.iter().map(|id| harness.service.resolve_token_id(id))).await;

    for (id, result) in ids.iter().zip(&results) {
        assert_eq!(result.as_ref().unwrap(), &derive_token_id(id.as_str()));
    }
    assert_eq!(harness.chain.registered_count(), ids.len());
    assert_eq!(
        harness.chain.calls.generate.load(Ordering::SeqCst),
        ids.len()
    );
}

#[tokio::test]
async fn test_concurrent_mints_cannot_pass_ceiling() {
    let harness = TestHarness::setup();
    let token_id = harness.chain.register(CAST);
    harness.chain.set_mint_count(token_id, U256::from(90));
    let quantity = I256::try_from(10_i64).unwrap();

    let requests = [
        MintRequest::new(RECIPIENT, token_id, quantity),
        MintRequest::new(RECIPIENT.to_lowercase(), token_id, quantity),
    ];
    let results = join_all(requests.iter().map(|r| harness.service.mint(r))).await;

    // Both passed the advisory check against the count of 90
    assert_eq!(harness.chain.calls.mint.load(Ordering::SeqCst), 2);

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(Error::MintFailed))));
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(100)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mints_across_threads() {
    let harness = Arc::new(TestHarness::setup());
    let token_id = harness.chain.register(CAST);
    harness.chain.set_mint_count(token_id, U256::from(80));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move {
                let request =
                    MintRequest::new(RECIPIENT, token_id, I256::try_from(10_i64).unwrap());
                harness.service.mint(&request).await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.expect("mint task panicked") {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(
                matches!(e, Error::MintFailed | Error::MintLimitExceeded { .. }),
                "{e}"
            ),
        }
    }

    assert_eq!(succeeded, 2);
    assert_eq!(harness.chain.mint_count(token_id), Some(U256::from(100)));
}
