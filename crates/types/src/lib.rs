//! Core type definitions for collectible content auctions.
//!
//! This crate provides the shared data structures used across the auction
//! system, including identities, per-auction records, global configuration,
//! and the signed authorization envelope.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

// =========================
// IDENTIFIERS
// =========================

/// Generic address type (32 bytes, Ed25519 public key bytes)
pub type Address = [u8; 32];

/// Identifier of the off-chain content record being auctioned (32 bytes)
pub type ContentId = [u8; 32];

/// Single-use random value bound into a signed authorization (32 bytes)
pub type Nonce = [u8; 32];

/// The all-zero address, used as the "nobody" sentinel
pub const ZERO_ADDRESS: Address = [0u8; 32];

// =========================
// AUCTION TYPES
// =========================

/// Basis-point denominator (1 bps = 1/10_000)
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Floor on the absolute bid increment, applied when the proportional
/// increment rounds down to zero. Keeps `highest_bid` strictly increasing.
pub const GLOBAL_MIN_BID_INCREMENT: u64 = 1;

/// Auction lifecycle phase.
///
/// `None`, `Active`, `Settled` and `Cancelled` are persisted in the
/// [`AuctionRecord`]; `Ended` is derived on read from `end_time` vs. the
/// current time and is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// No auction exists for the content id
    None,
    /// Accepting bids
    Active,
    /// Bidding period elapsed, awaiting settlement (derived, never stored)
    Ended,
    /// Winner paid out and collectible minted
    Settled,
    /// Terminated by an authorized cancellation, highest bid refunded
    Cancelled,
}

impl std::fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuctionPhase::None => write!(f, "none"),
            AuctionPhase::Active => write!(f, "active"),
            AuctionPhase::Ended => write!(f, "ended"),
            AuctionPhase::Settled => write!(f, "settled"),
            AuctionPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Global auction bounds, mutable only through the admin surface.
///
/// Every per-auction [`AuctionParams`] is validated against the live config
/// once, at start time.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Smallest permitted `AuctionParams::min_bid`
    pub min_bid_amount: u64,
    /// Shortest permitted auction duration (seconds)
    pub min_auction_duration: u64,
    /// Longest permitted auction duration (seconds)
    pub max_auction_duration: u64,
    /// Largest permitted per-bid anti-snipe extension (seconds)
    pub max_extension: u64,
}

/// Per-auction rules, fixed at start time and never mutated afterwards
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AuctionParams {
    /// Smallest acceptable opening bid
    pub min_bid: u64,
    /// Proportional outbid increment in basis points
    pub min_bid_increment_bps: u32,
    /// Protocol fee taken from the winning bid, in basis points
    pub protocol_fee_bps: u32,
    /// Bidding period length from start (seconds)
    pub duration: u64,
    /// Time added to `end_time` by a qualifying late bid (seconds)
    pub extension: u64,
    /// A bid within this many seconds of `end_time` triggers the extension
    pub extension_threshold: u64,
}

/// One auction per content id. Created once at start, mutated in place by
/// every subsequent bid, never deleted; finality is marked by `phase`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub creator: Address,
    pub creator_id: u64,
    pub highest_bidder: Address,
    pub highest_bidder_id: u64,
    pub highest_bid: u64,
    /// Timestamp of the most recent accepted bid (the opening bid counts)
    pub last_bid_at: u64,
    /// Bidding deadline; moves forward under the anti-snipe rule
    pub end_time: u64,
    pub bid_count: u32,
    /// Persisted phase; never `Ended` (see [`AuctionPhase`])
    pub phase: AuctionPhase,
    pub params: AuctionParams,
}

impl AuctionRecord {
    /// Derive the effective phase at `now`.
    ///
    /// `end_time == 0` means no record was ever written. A stored terminal
    /// phase wins; otherwise the bidding deadline decides Active vs. Ended.
    pub fn phase_at(&self, now: u64) -> AuctionPhase {
        if self.end_time == 0 {
            return AuctionPhase::None;
        }
        match self.phase {
            AuctionPhase::Settled => AuctionPhase::Settled,
            AuctionPhase::Cancelled => AuctionPhase::Cancelled,
            _ => {
                if now < self.end_time {
                    AuctionPhase::Active
                } else {
                    AuctionPhase::Ended
                }
            }
        }
    }

    /// Smallest offer that outbids the current highest bid:
    /// `highest_bid + max(GLOBAL_MIN_BID_INCREMENT, highest_bid * bps / 10_000)`
    pub fn min_next_bid(&self) -> u64 {
        let proportional = mul_bps(self.highest_bid, self.params.min_bid_increment_bps);
        self.highest_bid
            .saturating_add(proportional.max(GLOBAL_MIN_BID_INCREMENT))
    }
}

// =========================
// AUTHORIZATION
// =========================

/// Signed authorization produced by an off-chain authorizer.
///
/// The signature covers the canonical digest of one action's bound fields
/// (see the schema functions in the crypto crate), so an envelope is valid
/// for exactly one action on exactly one set of parameters.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AuthorizationEnvelope {
    /// Ed25519 public key of the signing authorizer
    pub authorizer: Address,
    /// Single-use random value; consumed on first successful verification
    pub nonce: Nonce,
    /// Absolute expiry (Unix seconds); the envelope is dead after this
    pub deadline: u64,
    /// Ed25519 signature over the schema digest
    #[serde_as(as = "[_; 64]")]
    pub signature: [u8; 64],
}

// =========================
// HELPER FUNCTIONS
// =========================

/// Multiply an amount by a basis-point fraction, rounding down.
/// Widens to u128 so `amount * bps` cannot overflow.
pub fn mul_bps(amount: u64, bps: u32) -> u64 {
    ((amount as u128 * bps as u128) / BPS_DENOMINATOR as u128) as u64
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(highest_bid: u64, increment_bps: u32, end_time: u64) -> AuctionRecord {
        AuctionRecord {
            creator: [1u8; 32],
            creator_id: 7,
            highest_bidder: [2u8; 32],
            highest_bidder_id: 8,
            highest_bid,
            last_bid_at: 0,
            end_time,
            bid_count: 1,
            phase: AuctionPhase::Active,
            params: AuctionParams {
                min_bid: 1_000_000,
                min_bid_increment_bps: increment_bps,
                protocol_fee_bps: 1000,
                duration: 86_400,
                extension: 900,
                extension_threshold: 900,
            },
        }
    }

    #[test]
    fn test_phase_derivation() {
        let mut rec = record(1_000_000, 1000, 86_400);
        assert_eq!(rec.phase_at(0), AuctionPhase::Active);
        assert_eq!(rec.phase_at(86_399), AuctionPhase::Active);
        assert_eq!(rec.phase_at(86_400), AuctionPhase::Ended);

        rec.phase = AuctionPhase::Settled;
        assert_eq!(rec.phase_at(0), AuctionPhase::Settled);

        rec.phase = AuctionPhase::Cancelled;
        assert_eq!(rec.phase_at(1_000_000), AuctionPhase::Cancelled);

        rec.end_time = 0;
        assert_eq!(rec.phase_at(0), AuctionPhase::None);
    }

    #[test]
    fn test_min_next_bid_proportional() {
        // 10% of 1_000_000 dominates the absolute floor
        let rec = record(1_000_000, 1000, 86_400);
        assert_eq!(rec.min_next_bid(), 1_100_000);
    }

    #[test]
    fn test_min_next_bid_floor() {
        // 1 bps of 9_999 rounds down to zero; the floor keeps bids strict
        let rec = record(9_999, 1, 86_400);
        assert_eq!(rec.min_next_bid(), 10_000);
    }

    #[test]
    fn test_mul_bps_no_overflow() {
        assert_eq!(mul_bps(u64::MAX, 10_000), u64::MAX);
        assert_eq!(mul_bps(1_100_000, 1000), 110_000);
        assert_eq!(mul_bps(0, 10_000), 0);
    }

    #[test]
    fn test_envelope_serialization() {
        let env = AuthorizationEnvelope {
            authorizer: [3u8; 32],
            nonce: [4u8; 32],
            deadline: 1_700_000_000,
            signature: [5u8; 64],
        };
        let encoded = borsh::to_vec(&env).unwrap();
        let decoded: AuthorizationEnvelope = borsh::from_slice(&encoded).unwrap();
        assert_eq!(env, decoded);
    }
}
