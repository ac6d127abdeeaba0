//! Error types for castmint.
//!
//! The first group of variants is the caller-facing taxonomy returned by the
//! resolver and mint operations. The second group is internal: collaborators
//! (cache, chain transport, verifier) report through them, and the public
//! operations normalize them before returning.

use thiserror::Error;

/// Result type for castmint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in castmint.
#[derive(Debug, Error)]
pub enum Error {
    /// Mint quantity was zero or negative.
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(String),

    /// Recipient is not a well-formed chain address.
    #[error("invalid recipient address: {0}")]
    InvalidAddress(String),

    /// Token id is not a base-10 `uint256`.
    #[error("invalid token id: {0}")]
    InvalidTokenId(String),

    /// Content id does not name an existing post.
    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    /// A token id for this content id is already cached.
    #[error("content {0} already has a token id")]
    AlreadyExists(String),

    /// Mint price or max mint limit could not be read.
    #[error("contract not initialized: mint price or limit unavailable")]
    NotInitialized,

    /// The mint count for the token could not be read.
    #[error("token {0} has not been generated")]
    TokenNotFound(String),

    /// Minting would push the token past its limit.
    #[error("mint limit exceeded: {current} minted + {requested} requested > limit {limit}")]
    MintLimitExceeded {
        /// Last observed mint count.
        current: String,
        /// Requested quantity.
        requested: String,
        /// Contract-wide limit.
        limit: String,
    },

    /// A state-changing transaction reverted or could not be confirmed.
    #[error("chain transaction failed")]
    ChainTransactionFailed,

    /// Inverse lookup produced no content id.
    #[error("content id not found for token {0}")]
    NotFound(String),

    /// Mint submission failed; cause logged, not returned.
    #[error("mint failed")]
    MintFailed,

    /// A read-only chain call required by the operation failed.
    #[error("chain unavailable")]
    ChainUnavailable,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache store error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Chain RPC transport error.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Content verification error.
    #[error("verification error: {0}")]
    Verification(String),
}

impl Error {
    /// Returns true for errors raised from input validation, before any I/O.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_) | Self::InvalidAddress(_) | Self::InvalidTokenId(_)
        )
    }
}
