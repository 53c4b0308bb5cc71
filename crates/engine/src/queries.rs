//! Read-only queries against engine state.
//!
//! Queries never mutate: phase and minimum-next-bid are derived from the
//! stored record and the timestamp the host passes in, so reads at the
//! same instant always agree with what a call at that instant would see.

use serde::{Deserialize, Serialize};

use auction_types::{Address, AuctionConfig, AuctionParams, AuctionPhase, ContentId, Nonce};

use crate::state::EngineState;

/// Queries supported by the auction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuctionQuery {
    /// Full view of one auction
    GetAuction { content_id: ContentId },
    /// Lifecycle phase of one content id
    GetPhase { content_id: ContentId },
    /// Smallest acceptable next bid, while the auction is active
    GetMinNextBid { content_id: ContentId },
    /// Every auction currently in the Active phase
    ListActiveAuctions,
    /// Sum of all funds held for active auctions
    GetEscrowTotal,
    /// Global config with its version and the control addresses
    GetConfig,
    /// Whether an identity is an accepted authorizer
    IsAuthorizer { authorizer: Address },
    /// Whether a nonce has been consumed
    IsNonceUsed { nonce: Nonce },
}

/// Responses to auction queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuctionQueryResponse {
    Auction(Option<AuctionSummary>),
    Phase(AuctionPhase),
    MinNextBid(Option<u64>),
    ActiveAuctions(Vec<AuctionSummary>),
    EscrowTotal(u64),
    Config(ConfigInfo),
    IsAuthorizer(bool),
    NonceUsed(bool),
}

/// Snapshot of one auction with its derived fields filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub content_id: ContentId,
    pub creator: Address,
    pub creator_id: u64,
    pub highest_bidder: Address,
    pub highest_bidder_id: u64,
    pub highest_bid: u64,
    pub last_bid_at: u64,
    pub end_time: u64,
    pub bid_count: u32,
    /// Phase as of the query timestamp
    pub phase: AuctionPhase,
    /// Smallest bid that would be accepted next
    pub min_next_bid: u64,
    pub params: AuctionParams,
}

impl AuctionSummary {
    fn from_record(
        content_id: ContentId,
        record: &auction_types::AuctionRecord,
        now: u64,
    ) -> Self {
        Self {
            content_id,
            creator: record.creator,
            creator_id: record.creator_id,
            highest_bidder: record.highest_bidder,
            highest_bidder_id: record.highest_bidder_id,
            highest_bid: record.highest_bid,
            last_bid_at: record.last_bid_at,
            end_time: record.end_time,
            bid_count: record.bid_count,
            phase: record.phase_at(now),
            min_next_bid: record.min_next_bid(),
            params: record.params.clone(),
        }
    }
}

/// Global configuration view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub config: AuctionConfig,
    pub version: u64,
    pub admin: Address,
    pub treasury: Address,
    pub paused: bool,
}

/// Answer a query against the current state at the given timestamp.
pub fn handle_query(state: &EngineState, now: u64, query: AuctionQuery) -> AuctionQueryResponse {
    match query {
        AuctionQuery::GetAuction { content_id } => AuctionQueryResponse::Auction(
            state
                .get_auction(&content_id)
                .map(|record| AuctionSummary::from_record(content_id, record, now)),
        ),
        AuctionQuery::GetPhase { content_id } => {
            AuctionQueryResponse::Phase(state.phase_of(&content_id, now))
        }
        AuctionQuery::GetMinNextBid { content_id } => {
            let min_next = state.get_auction(&content_id).and_then(|record| {
                if record.phase_at(now) == AuctionPhase::Active {
                    Some(record.min_next_bid())
                } else {
                    None
                }
            });
            AuctionQueryResponse::MinNextBid(min_next)
        }
        AuctionQuery::ListActiveAuctions => {
            AuctionQueryResponse::ActiveAuctions(get_active_auctions(state, now))
        }
        AuctionQuery::GetEscrowTotal => AuctionQueryResponse::EscrowTotal(state.escrow_total),
        AuctionQuery::GetConfig => AuctionQueryResponse::Config(ConfigInfo {
            config: state.config.clone(),
            version: state.config_version,
            admin: state.admin,
            treasury: state.treasury,
            paused: state.paused,
        }),
        AuctionQuery::IsAuthorizer { authorizer } => {
            AuctionQueryResponse::IsAuthorizer(state.is_authorizer(&authorizer))
        }
        AuctionQuery::IsNonceUsed { nonce } => {
            AuctionQueryResponse::NonceUsed(state.nonce_used(&nonce))
        }
    }
}

/// All auctions in the Active phase as of `now`, sorted by end time with
/// the soonest-ending first.
pub fn get_active_auctions(state: &EngineState, now: u64) -> Vec<AuctionSummary> {
    let mut active: Vec<AuctionSummary> = state
        .auctions
        .iter()
        .filter(|(_, record)| record.phase_at(now) == AuctionPhase::Active)
        .map(|(content_id, record)| AuctionSummary::from_record(*content_id, record, now))
        .collect();
    active.sort_by_key(|summary| (summary.end_time, summary.content_id));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_types::{AuctionParams, AuctionRecord};

    const ADMIN: Address = [100u8; 32];
    const TREASURY: Address = [101u8; 32];

    fn test_config() -> AuctionConfig {
        AuctionConfig {
            min_bid_amount: 1_000_000,
            min_auction_duration: 3600,
            max_auction_duration: 2_592_000,
            max_extension: 86_400,
        }
    }

    fn test_record(end_time: u64, highest_bid: u64) -> AuctionRecord {
        AuctionRecord {
            creator: [102u8; 32],
            creator_id: 7,
            highest_bidder: [1u8; 32],
            highest_bidder_id: 11,
            highest_bid,
            last_bid_at: 0,
            end_time,
            bid_count: 1,
            phase: AuctionPhase::Active,
            params: AuctionParams {
                min_bid: 1_000_000,
                min_bid_increment_bps: 1000,
                protocol_fee_bps: 1000,
                duration: 86_400,
                extension: 900,
                extension_threshold: 900,
            },
        }
    }

    fn test_state() -> EngineState {
        EngineState::new(ADMIN, TREASURY, test_config(), vec![[9u8; 32]])
    }

    #[test]
    fn test_get_auction_fills_derived_fields() {
        let mut state = test_state();
        state.auctions.insert([42u8; 32], test_record(86_400, 1_000_000));

        let response = handle_query(&state, 100, AuctionQuery::GetAuction { content_id: [42u8; 32] });
        let summary = match response {
            AuctionQueryResponse::Auction(Some(summary)) => summary,
            other => panic!("unexpected response: {other:?}"),
        };
        assert_eq!(summary.phase, AuctionPhase::Active);
        assert_eq!(summary.min_next_bid, 1_100_000);
        assert_eq!(summary.end_time, 86_400);

        let response = handle_query(&state, 100, AuctionQuery::GetAuction { content_id: [1u8; 32] });
        assert!(matches!(response, AuctionQueryResponse::Auction(None)));
    }

    #[test]
    fn test_phase_tracks_timestamp() {
        let mut state = test_state();
        state.auctions.insert([42u8; 32], test_record(86_400, 1_000_000));

        let phase_at = |now| match handle_query(&state, now, AuctionQuery::GetPhase { content_id: [42u8; 32] }) {
            AuctionQueryResponse::Phase(phase) => phase,
            other => panic!("unexpected response: {other:?}"),
        };
        assert_eq!(phase_at(86_399), AuctionPhase::Active);
        assert_eq!(phase_at(86_400), AuctionPhase::Ended);
    }

    #[test]
    fn test_min_next_bid_only_while_active() {
        let mut state = test_state();
        state.auctions.insert([42u8; 32], test_record(86_400, 1_000_000));

        let min_next = |now| match handle_query(&state, now, AuctionQuery::GetMinNextBid { content_id: [42u8; 32] }) {
            AuctionQueryResponse::MinNextBid(value) => value,
            other => panic!("unexpected response: {other:?}"),
        };
        assert_eq!(min_next(100), Some(1_100_000));
        assert_eq!(min_next(86_400), None);
    }

    #[test]
    fn test_active_auctions_sorted_by_end_time() {
        let mut state = test_state();
        state.auctions.insert([3u8; 32], test_record(90_000, 1_000_000));
        state.auctions.insert([1u8; 32], test_record(86_400, 1_000_000));
        state.auctions.insert([2u8; 32], test_record(88_000, 1_000_000));
        // Already past its end at the query time
        state.auctions.insert([4u8; 32], test_record(100, 1_000_000));

        let active = get_active_auctions(&state, 1000);
        let ids: Vec<ContentId> = active.iter().map(|s| s.content_id).collect();
        assert_eq!(ids, vec![[1u8; 32], [2u8; 32], [3u8; 32]]);
    }

    #[test]
    fn test_config_query_reflects_state() {
        let mut state = test_state();
        state.paused = true;
        state.config_version = 3;

        let response = handle_query(&state, 0, AuctionQuery::GetConfig);
        let info = match response {
            AuctionQueryResponse::Config(info) => info,
            other => panic!("unexpected response: {other:?}"),
        };
        assert_eq!(info.version, 3);
        assert!(info.paused);
        assert_eq!(info.treasury, TREASURY);
        assert_eq!(info.config.min_bid_amount, 1_000_000);
    }
}
