//! Service event system.

use crate::types::{ContentId, TokenId};
use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::broadcast;

/// Events emitted after state-changing chain operations confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// A token id was registered on-chain for a content id.
    TokenGenerated {
        /// Content the token was generated for.
        content_id: ContentId,
        /// The new token id.
        token_id: TokenId,
    },

    /// A mint confirmed.
    Minted {
        /// Minted token.
        token_id: TokenId,
        /// Recipient of the minted units.
        recipient: Address,
        /// Units minted.
        quantity: U256,
        /// Mint transaction, if a receipt was returned.
        tx_hash: Option<TxHash>,
    },
}

/// Channel for receiving service events.
pub type ServiceEventsChannel = broadcast::Receiver<ServiceEvent>;

/// Sender for service events.
pub type ServiceEventsSender = broadcast::Sender<ServiceEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (ServiceEventsSender, ServiceEventsChannel) {
    broadcast::channel(256)
}
