//! Canonical message schemas for signed auction authorizations.
//!
//! Every authorized action has its own schema: a SHA-256 digest over an
//! ASCII domain prefix, the action's bound fields, and the envelope's
//! nonce and deadline. The prefixes differ per action, so a signature
//! produced for one schema can never verify under another.
//!
//! Schemas:
//!
//! - **Start** binds content id, creator, creator id, bidder, bidder id,
//!   amount, and every field of the auction params.
//! - **Bid** binds content id, bidder, bidder id, amount.
//! - **Cancel** binds content id only.
//!
//! All multi-byte integers are serialized little-endian. The authorizing
//! service must sign exactly these digests; any field mismatch between
//! the signed values and the submitted call makes verification fail.

use sha2::{Digest, Sha256};

use auction_types::{Address, AuctionParams, ContentId, Nonce};

/// Domain prefix for start authorizations
pub const START_DOMAIN: &[u8] = b"COLLECTIBLE_AUCTION_START_V1:";

/// Domain prefix for bid authorizations
pub const BID_DOMAIN: &[u8] = b"COLLECTIBLE_AUCTION_BID_V1:";

/// Domain prefix for cancel authorizations
pub const CANCEL_DOMAIN: &[u8] = b"COLLECTIBLE_AUCTION_CANCEL_V1:";

/// Compute the digest an authorizer signs to approve starting an auction.
///
/// # Arguments
/// * `content_id` - The content record being auctioned
/// * `creator` - Payout address of the content's creator
/// * `creator_id` - Off-chain account id of the creator
/// * `bidder` - Address placing the opening bid
/// * `bidder_id` - Off-chain account id of the opening bidder
/// * `amount` - Opening bid amount
/// * `params` - The full per-auction rules being locked in
/// * `nonce` - Single-use value from the envelope
/// * `deadline` - Absolute expiry from the envelope
#[allow(clippy::too_many_arguments)]
pub fn start_digest(
    content_id: &ContentId,
    creator: &Address,
    creator_id: u64,
    bidder: &Address,
    bidder_id: u64,
    amount: u64,
    params: &AuctionParams,
    nonce: &Nonce,
    deadline: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(START_DOMAIN);
    hasher.update(content_id);
    hasher.update(creator);
    hasher.update(creator_id.to_le_bytes());
    hasher.update(bidder);
    hasher.update(bidder_id.to_le_bytes());
    hasher.update(amount.to_le_bytes());
    hasher.update(params.min_bid.to_le_bytes());
    hasher.update(params.min_bid_increment_bps.to_le_bytes());
    hasher.update(params.protocol_fee_bps.to_le_bytes());
    hasher.update(params.duration.to_le_bytes());
    hasher.update(params.extension.to_le_bytes());
    hasher.update(params.extension_threshold.to_le_bytes());
    hasher.update(nonce);
    hasher.update(deadline.to_le_bytes());
    hasher.finalize().into()
}

/// Compute the digest an authorizer signs to approve a bid.
pub fn bid_digest(
    content_id: &ContentId,
    bidder: &Address,
    bidder_id: u64,
    amount: u64,
    nonce: &Nonce,
    deadline: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(BID_DOMAIN);
    hasher.update(content_id);
    hasher.update(bidder);
    hasher.update(bidder_id.to_le_bytes());
    hasher.update(amount.to_le_bytes());
    hasher.update(nonce);
    hasher.update(deadline.to_le_bytes());
    hasher.finalize().into()
}

/// Compute the digest an authorizer signs to approve cancelling an auction.
pub fn cancel_digest(content_id: &ContentId, nonce: &Nonce, deadline: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(CANCEL_DOMAIN);
    hasher.update(content_id);
    hasher.update(nonce);
    hasher.update(deadline.to_le_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AuctionParams {
        AuctionParams {
            min_bid: 1_000_000,
            min_bid_increment_bps: 1000,
            protocol_fee_bps: 1000,
            duration: 86_400,
            extension: 900,
            extension_threshold: 900,
        }
    }

    #[test]
    fn test_schemas_have_distinct_domains() {
        let content_id = [1u8; 32];
        let bidder = [2u8; 32];
        let nonce = [3u8; 32];

        let start = start_digest(&content_id, &bidder, 1, &bidder, 2, 5, &params(), &nonce, 10);
        let bid = bid_digest(&content_id, &bidder, 2, 5, &nonce, 10);
        let cancel = cancel_digest(&content_id, &nonce, 10);

        assert_ne!(start, bid);
        assert_ne!(start, cancel);
        assert_ne!(bid, cancel);
    }

    #[test]
    fn test_bid_digest_binds_every_field() {
        let base = bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_000, &[3u8; 32], 100);

        assert_ne!(base, bid_digest(&[9u8; 32], &[2u8; 32], 7, 1_000_000, &[3u8; 32], 100));
        assert_ne!(base, bid_digest(&[1u8; 32], &[9u8; 32], 7, 1_000_000, &[3u8; 32], 100));
        assert_ne!(base, bid_digest(&[1u8; 32], &[2u8; 32], 9, 1_000_000, &[3u8; 32], 100));
        assert_ne!(base, bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_001, &[3u8; 32], 100));
        assert_ne!(base, bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_000, &[9u8; 32], 100));
        assert_ne!(base, bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_000, &[3u8; 32], 101));
    }

    #[test]
    fn test_start_digest_binds_params() {
        let content_id = [1u8; 32];
        let creator = [2u8; 32];
        let bidder = [3u8; 32];
        let nonce = [4u8; 32];

        let base = start_digest(&content_id, &creator, 1, &bidder, 2, 5, &params(), &nonce, 10);

        let mut changed = params();
        changed.extension_threshold = 901;
        let other = start_digest(&content_id, &creator, 1, &bidder, 2, 5, &changed, &nonce, 10);

        assert_ne!(base, other);
    }
}
