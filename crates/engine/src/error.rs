//! Auction engine error types.

use thiserror::Error;

use auction_types::ContentId;

use crate::assets::{AssetError, MintError};

/// Errors that can occur in the auction engine.
///
/// Every error is fatal to the call that produced it: handlers validate
/// before mutating, so an `Err` return means no state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    // === Authorization ===
    #[error("Authorization expired at {deadline}, now {now}")]
    ExpiredAuthorization { deadline: u64, now: u64 },

    #[error("Signer is not a registered authorizer")]
    UnauthorizedSigner,

    #[error("Authorization nonce already consumed")]
    ReplayedNonce,

    #[error("Invalid authorization signature")]
    InvalidSignature,

    // === Validation ===
    #[error("Invalid auction params: {0}")]
    InvalidAuctionParams(String),

    #[error("Invalid bid amount: need at least {required}, got {got}")]
    InvalidBidAmount { required: u64, got: u64 },

    #[error("Content id must be non-zero")]
    InvalidContentId,

    #[error("Creator id must be non-zero")]
    InvalidCreatorId,

    #[error("Invalid auction config: {0}")]
    InvalidConfig(String),

    // === Lifecycle state ===
    #[error("Auction not found for content {}", hex::encode(.0))]
    AuctionNotFound(ContentId),

    #[error("Auction already exists for content {}", hex::encode(.0))]
    AuctionAlreadyExists(ContentId),

    #[error("Auction is not active")]
    AuctionNotActive,

    #[error("Auction has not ended")]
    AuctionNotEnded,

    #[error("Auction already settled")]
    AuctionAlreadySettled,

    #[error("Auction was cancelled")]
    AuctionCancelled,

    // === Funds ===
    #[error("Funds transfer failed: {0}")]
    Transfer(#[from] AssetError),

    #[error("Collectible mint failed: {0}")]
    Mint(#[from] MintError),

    // === Administration ===
    #[error("Not authorized")]
    NotAuthorized,

    #[error("Auction engine is paused")]
    Paused,
}
