//! Call message types for the auction engine.

use borsh::{BorshDeserialize, BorshSerialize};

use auction_types::{Address, AuctionConfig, AuctionParams, AuthorizationEnvelope, ContentId};

/// State-changing calls accepted by the engine.
///
/// The lifecycle calls that need an off-chain co-signature carry an
/// [`AuthorizationEnvelope`] bound to their exact field values; the caller
/// of the enclosing transport is the acting bidder.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub enum AuctionCall {
    // === Auction Lifecycle ===
    /// Open an auction for a content record with its first bid.
    Start {
        content_id: ContentId,
        creator: Address,
        creator_id: u64,
        bidder_id: u64,
        amount: u64,
        params: AuctionParams,
        envelope: AuthorizationEnvelope,
    },

    /// Outbid the current highest bid.
    Bid {
        content_id: ContentId,
        bidder_id: u64,
        amount: u64,
        envelope: AuthorizationEnvelope,
    },

    /// Settle an ended auction: pay out and mint (permissionless).
    Settle { content_id: ContentId },

    /// Settle several ended auctions; all succeed or none are applied.
    BatchSettle { content_ids: Vec<ContentId> },

    /// Cancel an active auction and refund the highest bidder.
    Cancel {
        content_id: ContentId,
        envelope: AuthorizationEnvelope,
    },

    // === Admin ===
    /// Register an identity as an accepted authorizer.
    AllowAuthorizer { authorizer: Address },

    /// Remove an identity from the authorizer set.
    DenyAuthorizer { authorizer: Address },

    /// Change the protocol-fee recipient.
    SetTreasury { treasury: Address },

    /// Replace the global auction config (bumps the config version).
    SetConfig { config: AuctionConfig },

    /// Block all state-changing auction calls.
    Pause,

    /// Re-enable state-changing auction calls.
    Unpause,
}
