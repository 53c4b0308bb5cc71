//! Engine state structures.
//!
//! One [`EngineState`] value holds everything the handlers read and write:
//! the auction registry, the nonce ledger, the authorizer set, the global
//! config, and the escrow accounting. The host serializes access (a single
//! writer at a time), which is what makes the per-call atomicity guarantees
//! in the handlers sound.

use std::collections::{HashMap, HashSet};

use auction_types::{Address, AuctionConfig, AuctionPhase, AuctionRecord, ContentId, Nonce};

/// Auction engine state.
///
/// Plain in-memory data; the host wraps it in its own lock. Records are
/// created once per content id and never removed, so a finished auction
/// stays queryable forever.
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Identity allowed to call the admin surface
    pub admin: Address,

    /// Recipient of the protocol fee at settlement
    pub treasury: Address,

    /// Global bounds applied to per-auction params at start time
    pub config: AuctionConfig,

    /// Bumped by every successful SetConfig
    pub config_version: u64,

    /// While set, every state-changing auction call is rejected
    pub paused: bool,

    /// Identities whose authorization signatures are accepted
    pub authorizers: HashSet<Address>,

    /// Every nonce ever consumed, across all content ids
    pub used_nonces: HashSet<Nonce>,

    /// One record per content id
    pub auctions: HashMap<ContentId, AuctionRecord>,

    /// Aggregate custodied amount; equals the sum of `highest_bid` over
    /// all Active auctions
    pub escrow_total: u64,
}

impl EngineState {
    /// Create a fresh engine state.
    pub fn new(
        admin: Address,
        treasury: Address,
        config: AuctionConfig,
        authorizers: Vec<Address>,
    ) -> Self {
        Self {
            admin,
            treasury,
            config,
            config_version: 1,
            paused: false,
            authorizers: authorizers.into_iter().collect(),
            used_nonces: HashSet::new(),
            auctions: HashMap::new(),
            escrow_total: 0,
        }
    }

    /// Get auction record by content id.
    pub fn get_auction(&self, content_id: &ContentId) -> Option<&AuctionRecord> {
        self.auctions.get(content_id)
    }

    /// Get mutable auction record by content id.
    pub fn get_auction_mut(&mut self, content_id: &ContentId) -> Option<&mut AuctionRecord> {
        self.auctions.get_mut(content_id)
    }

    /// Derive the effective phase of a content id at `now`.
    pub fn phase_of(&self, content_id: &ContentId, now: u64) -> AuctionPhase {
        self.auctions
            .get(content_id)
            .map(|record| record.phase_at(now))
            .unwrap_or(AuctionPhase::None)
    }

    /// Whether an identity may sign authorizations.
    pub fn is_authorizer(&self, identity: &Address) -> bool {
        self.authorizers.contains(identity)
    }

    /// Whether a nonce has already been consumed.
    pub fn nonce_used(&self, nonce: &Nonce) -> bool {
        self.used_nonces.contains(nonce)
    }

    /// Consume a nonce. Returns false if it was already used.
    pub fn consume_nonce(&mut self, nonce: Nonce) -> bool {
        self.used_nonces.insert(nonce)
    }

    /// Record funds entering custody.
    pub fn add_escrow(&mut self, amount: u64) {
        self.escrow_total += amount;
    }

    /// Record funds leaving custody. Returns false on underflow.
    pub fn subtract_escrow(&mut self, amount: u64) -> bool {
        if self.escrow_total >= amount {
            self.escrow_total -= amount;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> EngineState {
        EngineState::new(
            [9u8; 32],
            [8u8; 32],
            AuctionConfig {
                min_bid_amount: 1_000_000,
                min_auction_duration: 3600,
                max_auction_duration: 2_592_000,
                max_extension: 86_400,
            },
            vec![[7u8; 32]],
        )
    }

    #[test]
    fn test_phase_of_missing_record() {
        let state = test_state();
        assert_eq!(state.phase_of(&[1u8; 32], 0), AuctionPhase::None);
    }

    #[test]
    fn test_nonce_consumption() {
        let mut state = test_state();
        let nonce = [5u8; 32];

        assert!(!state.nonce_used(&nonce));
        assert!(state.consume_nonce(nonce));
        assert!(state.nonce_used(&nonce));
        assert!(!state.consume_nonce(nonce));
    }

    #[test]
    fn test_escrow_accounting() {
        let mut state = test_state();

        state.add_escrow(100);
        state.add_escrow(50);
        assert_eq!(state.escrow_total, 150);

        assert!(state.subtract_escrow(75));
        assert_eq!(state.escrow_total, 75);

        assert!(!state.subtract_escrow(100));
        assert_eq!(state.escrow_total, 75);
    }

    #[test]
    fn test_authorizer_membership() {
        let state = test_state();
        assert!(state.is_authorizer(&[7u8; 32]));
        assert!(!state.is_authorizer(&[6u8; 32]));
    }
}
