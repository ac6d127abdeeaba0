//! Content verification.
//!
//! Before a token is generated for a content id, the content system must
//! confirm the id names a real post. Any failure means "not real".

mod hub;

pub use hub::HubVerifier;

use crate::error::Result;
use crate::types::ContentId;
use async_trait::async_trait;

/// Confirms a content id refers to existing content.
#[async_trait]
pub trait ContentVerifier: Send + Sync {
    /// Succeeds only if `content_id` names a real post.
    ///
    /// # Errors
    ///
    /// Any error means the content could not be confirmed.
    async fn verify(&self, content_id: &ContentId) -> Result<()>;
}
