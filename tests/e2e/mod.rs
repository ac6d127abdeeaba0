//! End-to-end tests for castmint.
//!
//! These tests drive [`castmint::MintService`] against an in-memory contract
//! ([`harness::MockChain`]) and content verifier, so no node or network is
//! required.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test e2e
//! ```

mod concurrency;
mod minting;

pub use harness::{CacheMode, MockChain, MockVerifier, TestHarness};
