//! RPC-compatible types for the auction service.
//!
//! These types are JSON-serializable versions of the engine types, with
//! byte identifiers carried as hex strings.

use serde::{Deserialize, Serialize};

use auction_engine::events::{
    AuctionEvent, AuctionSettled as SettledEvent, AuctionStarted, BidPlaced, BidRefunded,
};
use auction_engine::{AuctionSummary, ConfigInfo};
use auction_types::{AuctionConfig, AuctionParams};

/// Capability envelope for RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeRpc {
    /// Hex-encoded authorizer verifying key (32 bytes)
    pub authorizer: String,
    /// Hex-encoded nonce (32 bytes)
    pub nonce: String,
    /// Absolute expiry (Unix seconds)
    pub deadline: u64,
    /// Hex-encoded Ed25519 signature (64 bytes)
    pub signature: String,
}

/// Parameters for starting an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAuctionParams {
    pub sender: String,
    /// Hex-encoded content id (32 bytes)
    pub content_id: String,
    /// Hex-encoded creator address
    pub creator: String,
    pub creator_id: u64,
    pub bidder_id: u64,
    /// Opening bid amount
    pub amount: u64,
    pub params: AuctionParams,
    pub envelope: EnvelopeRpc,
}

/// Parameters for placing a bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidParams {
    pub sender: String,
    pub content_id: String,
    pub bidder_id: u64,
    pub amount: u64,
    pub envelope: EnvelopeRpc,
}

/// Parameters for settling one auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleParams {
    pub sender: String,
    pub content_id: String,
}

/// Parameters for settling several auctions atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettleParams {
    pub sender: String,
    pub content_ids: Vec<String>,
}

/// Parameters for cancelling an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelParams {
    pub sender: String,
    pub content_id: String,
    pub envelope: EnvelopeRpc,
}

/// Parameters for replacing the global config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetConfigParams {
    pub sender: String,
    pub config: AuctionConfig,
}

/// Auction view for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSummaryRpc {
    pub content_id: String,
    pub creator: String,
    pub creator_id: u64,
    pub highest_bidder: String,
    pub highest_bidder_id: u64,
    pub highest_bid: u64,
    pub last_bid_at: u64,
    pub end_time: u64,
    pub bid_count: u32,
    pub phase: String,
    pub min_next_bid: u64,
    pub params: AuctionParams,
}

impl From<&AuctionSummary> for AuctionSummaryRpc {
    fn from(s: &AuctionSummary) -> Self {
        Self {
            content_id: hex::encode(s.content_id),
            creator: hex::encode(s.creator),
            creator_id: s.creator_id,
            highest_bidder: hex::encode(s.highest_bidder),
            highest_bidder_id: s.highest_bidder_id,
            highest_bid: s.highest_bid,
            last_bid_at: s.last_bid_at,
            end_time: s.end_time,
            bid_count: s.bid_count,
            phase: s.phase.to_string(),
            min_next_bid: s.min_next_bid,
            params: s.params.clone(),
        }
    }
}

/// Global config view for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfoRpc {
    pub config: AuctionConfig,
    pub version: u64,
    pub admin: String,
    pub treasury: String,
    pub paused: bool,
}

impl From<&ConfigInfo> for ConfigInfoRpc {
    fn from(info: &ConfigInfo) -> Self {
        Self {
            config: info.config.clone(),
            version: info.version,
            admin: hex::encode(info.admin),
            treasury: hex::encode(info.treasury),
            paused: info.paused,
        }
    }
}

/// Settlement outcome for RPC responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledRpc {
    pub content_id: String,
    pub winner: String,
    pub winner_id: u64,
    pub amount: u64,
    pub protocol_fee: u64,
    pub creator_amount: u64,
    pub creator: String,
    pub treasury: String,
}

impl From<&SettledEvent> for SettledRpc {
    fn from(e: &SettledEvent) -> Self {
        Self {
            content_id: hex::encode(e.content_id),
            winner: hex::encode(e.winner),
            winner_id: e.winner_id,
            amount: e.amount,
            protocol_fee: e.protocol_fee,
            creator_amount: e.creator_amount,
            creator: hex::encode(e.creator),
            treasury: hex::encode(e.treasury),
        }
    }
}

/// Ledger view of one address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRpc {
    pub address: String,
    pub balance: u64,
    pub allowance: u64,
}

/// Auction event for RPC responses, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuctionEventRpc {
    AuctionStarted {
        content_id: String,
        creator: String,
        creator_id: u64,
        bidder: String,
        bidder_id: u64,
        amount: u64,
        end_time: u64,
        timestamp: u64,
    },
    BidPlaced {
        content_id: String,
        bidder: String,
        bidder_id: u64,
        amount: u64,
        previous_bidder: String,
        previous_bid: u64,
        bid_count: u32,
        end_time: u64,
        timestamp: u64,
    },
    AuctionExtended {
        content_id: String,
        new_end_time: u64,
        timestamp: u64,
    },
    AuctionSettled {
        content_id: String,
        winner: String,
        winner_id: u64,
        amount: u64,
        protocol_fee: u64,
        creator_amount: u64,
        creator: String,
        treasury: String,
        timestamp: u64,
    },
    AuctionCancelled {
        content_id: String,
        timestamp: u64,
    },
    BidRefunded {
        content_id: String,
        bidder: String,
        amount: u64,
        timestamp: u64,
    },
}

impl From<&AuctionEvent> for AuctionEventRpc {
    fn from(event: &AuctionEvent) -> Self {
        match event {
            AuctionEvent::Started(AuctionStarted {
                content_id,
                creator,
                creator_id,
                bidder,
                bidder_id,
                amount,
                end_time,
                timestamp,
                ..
            }) => AuctionEventRpc::AuctionStarted {
                content_id: hex::encode(content_id),
                creator: hex::encode(creator),
                creator_id: *creator_id,
                bidder: hex::encode(bidder),
                bidder_id: *bidder_id,
                amount: *amount,
                end_time: *end_time,
                timestamp: *timestamp,
            },
            AuctionEvent::BidPlaced(BidPlaced {
                content_id,
                bidder,
                bidder_id,
                amount,
                previous_bidder,
                previous_bid,
                bid_count,
                end_time,
                timestamp,
            }) => AuctionEventRpc::BidPlaced {
                content_id: hex::encode(content_id),
                bidder: hex::encode(bidder),
                bidder_id: *bidder_id,
                amount: *amount,
                previous_bidder: hex::encode(previous_bidder),
                previous_bid: *previous_bid,
                bid_count: *bid_count,
                end_time: *end_time,
                timestamp: *timestamp,
            },
            AuctionEvent::Extended(e) => AuctionEventRpc::AuctionExtended {
                content_id: hex::encode(e.content_id),
                new_end_time: e.new_end_time,
                timestamp: e.timestamp,
            },
            AuctionEvent::Settled(e) => AuctionEventRpc::AuctionSettled {
                content_id: hex::encode(e.content_id),
                winner: hex::encode(e.winner),
                winner_id: e.winner_id,
                amount: e.amount,
                protocol_fee: e.protocol_fee,
                creator_amount: e.creator_amount,
                creator: hex::encode(e.creator),
                treasury: hex::encode(e.treasury),
                timestamp: e.timestamp,
            },
            AuctionEvent::Cancelled(e) => AuctionEventRpc::AuctionCancelled {
                content_id: hex::encode(e.content_id),
                timestamp: e.timestamp,
            },
            AuctionEvent::Refunded(BidRefunded {
                content_id,
                bidder,
                amount,
                timestamp,
            }) => AuctionEventRpc::BidRefunded {
                content_id: hex::encode(content_id),
                bidder: hex::encode(bidder),
                amount: *amount,
                timestamp: *timestamp,
            },
        }
    }
}
