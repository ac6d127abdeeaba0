//! Namespaced cache keys.

use crate::types::{ContentId, TokenId};
use std::fmt;

/// A cache key, rendered to the string form the store sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Content id for a token: `castId:<tokenId>`.
    ContentId(TokenId),
    /// Token id for a content id: `tokenId:<contentId>`.
    TokenId(ContentId),
    /// Contract-wide mint price: `mintPrice`.
    MintPrice,
    /// Contract-wide per-token limit: `maxMintLimit`.
    MaxMintLimit,
    /// Units minted so far for a token: `tokenMintCount:<tokenId>`.
    TokenMintCount(TokenId),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentId(token_id) => write!(f, "castId:{token_id}"),
            Self::TokenId(content_id) => write!(f, "tokenId:{content_id}"),
            Self::MintPrice => f.write_str("mintPrice"),
            Self::MaxMintLimit => f.write_str("maxMintLimit"),
            Self::TokenMintCount(token_id) => write!(f, "tokenMintCount:{token_id}"),
        }
    }
}
