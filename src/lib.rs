//! # castmint
//!
//! Maps off-chain content identifiers (cast hashes or URLs) to on-chain
//! ERC-1155 token identifiers and authorizes quota-checked mints against the
//! cast token contract.
//!
//! ## Components
//!
//! - [`cache`]: TTL-bounded key-value store used purely for acceleration
//! - [`chain`]: typed facade over the cast token contract
//! - [`verifier`]: confirms a content identifier names a real post
//! - [`resolver`]: cache-aside id resolution and idempotent generation
//! - [`mint`]: mint validation, quota check and payment computation
//!
//! [`ServiceBuilder`] wires these together once from a validated
//! [`ServiceConfig`] and hands out a [`MintService`] that request handlers
//! share by reference.

#![forbid(unsafe_code)]

pub mod cache;
pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod mint;
pub mod resolver;
pub mod service;
pub mod types;
pub mod verifier;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use event::{ServiceEvent, ServiceEventsChannel};
pub use mint::MintAuthorizer;
pub use resolver::TokenResolver;
pub use service::{MintService, ServiceBuilder};
pub use types::{ContentId, MintRequest, TokenId, TxReceipt};
