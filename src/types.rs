//! Core identifiers and request/receipt types.

use crate::error::{Error, Result};
use alloy::primitives::{Address, TxHash, I256, U256};
use std::fmt;
use std::str::FromStr;

/// Opaque handle to a post, issued by the content system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a content identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as passed by the content system.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is a post URL rather than a hash.
    #[must_use]
    pub fn is_url(&self) -> bool {
        self.0.starts_with("https://") || self.0.starts_with("http://")
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// On-chain token identifier, deterministically derived from a [`ContentId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(U256);

impl TokenId {
    /// Wrap a raw `uint256`.
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// The raw `uint256` value.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<U256> for TokenId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = Error;

    /// Parses a base-10 token id, the form used in cache values and on the CLI.
    fn from_str(s: &str) -> Result<Self> {
        U256::from_str_radix(s.trim(), 10)
            .map(Self)
            .map_err(|_| Error::InvalidTokenId(s.to_string()))
    }
}

/// A request to mint `quantity` units of `token_id` to `recipient`.
///
/// `quantity` is signed so that non-positive requests can be expressed and
/// rejected by validation rather than by the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// Chain-format recipient address, as supplied by the caller.
    pub recipient: String,
    /// Token to mint.
    pub token_id: TokenId,
    /// Units to mint.
    pub quantity: I256,
}

impl MintRequest {
    /// Create a new mint request.
    #[must_use]
    pub fn new(recipient: impl Into<String>, token_id: TokenId, quantity: I256) -> Self {
        Self {
            recipient: recipient.into(),
            token_id,
            quantity,
        }
    }

    /// Validate quantity then recipient, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuantity`] for zero or negative quantities and
    /// [`Error::InvalidAddress`] for a malformed recipient.
    pub fn validate(&self) -> Result<(Address, U256)> {
        if !self.quantity.is_positive() {
            return Err(Error::InvalidQuantity(self.quantity.to_string()));
        }
        let recipient = parse_address(&self.recipient)?;
        Ok((recipient, self.quantity.into_raw()))
    }
}

/// Confirmation record for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the confirmed transaction.
    pub transaction_hash: TxHash,
    /// Block the transaction was included in, if reported.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
}

impl fmt::Display for TxReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block_number {
            Some(block) => write!(
                f,
                "{} (block {block}, gas {})",
                self.transaction_hash, self.gas_used
            ),
            None => write!(f, "{} (gas {})", self.transaction_hash, self.gas_used),
        }
    }
}

/// Parse a chain address.
///
/// Accepts 40 hex digits with an optional `0x` prefix. All-lowercase and
/// all-uppercase forms are accepted as-is; mixed case must carry a valid
/// EIP-55 checksum.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the string is not a valid address.
pub fn parse_address(s: &str) -> Result<Address> {
    let invalid = || Error::InvalidAddress(s.to_string());
    let digits = s.strip_prefix("0x").unwrap_or(s);

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{digits}"), None).map_err(|_| invalid())
    } else {
        Address::from_str(digits).map_err(|_| invalid())
    }
}
