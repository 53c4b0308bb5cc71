//! Observable events emitted by the handlers.
//!
//! Every state-changing call returns the events it produced, in order. Each
//! event carries the content id plus every field an indexer needs to
//! reconstruct the auction's state without re-reading storage. The host
//! decides what to do with them (the server logs each one and keeps an
//! in-order log for queries).

use serde::{Deserialize, Serialize};

use auction_types::{Address, AuctionParams, ContentId};

/// A new auction was opened with its first bid already escrowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionStarted {
    pub content_id: ContentId,
    pub creator: Address,
    pub creator_id: u64,
    pub bidder: Address,
    pub bidder_id: u64,
    pub amount: u64,
    pub end_time: u64,
    pub params: AuctionParams,
    pub timestamp: u64,
}

/// A bid was accepted as the new highest bid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPlaced {
    pub content_id: ContentId,
    pub bidder: Address,
    pub bidder_id: u64,
    pub amount: u64,
    pub previous_bidder: Address,
    pub previous_bid: u64,
    pub bid_count: u32,
    pub end_time: u64,
    pub timestamp: u64,
}

/// A qualifying late bid pushed the deadline out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionExtended {
    pub content_id: ContentId,
    pub new_end_time: u64,
    pub timestamp: u64,
}

/// The auction was settled: funds split and collectible minted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSettled {
    pub content_id: ContentId,
    pub winner: Address,
    pub winner_id: u64,
    pub amount: u64,
    pub protocol_fee: u64,
    pub creator_amount: u64,
    pub creator: Address,
    pub treasury: Address,
    pub timestamp: u64,
}

/// The auction was cancelled by an authorized cancellation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionCancelled {
    pub content_id: ContentId,
    pub timestamp: u64,
}

/// Escrowed funds were returned to a bidder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRefunded {
    pub content_id: ContentId,
    pub bidder: Address,
    pub amount: u64,
    pub timestamp: u64,
}

/// Union of everything the engine can emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    Started(AuctionStarted),
    BidPlaced(BidPlaced),
    Extended(AuctionExtended),
    Settled(AuctionSettled),
    Cancelled(AuctionCancelled),
    Refunded(BidRefunded),
}

impl AuctionEvent {
    /// The content id this event is about.
    pub fn content_id(&self) -> &ContentId {
        match self {
            AuctionEvent::Started(e) => &e.content_id,
            AuctionEvent::BidPlaced(e) => &e.content_id,
            AuctionEvent::Extended(e) => &e.content_id,
            AuctionEvent::Settled(e) => &e.content_id,
            AuctionEvent::Cancelled(e) => &e.content_id,
            AuctionEvent::Refunded(e) => &e.content_id,
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AuctionEvent::Started(_) => "auction_started",
            AuctionEvent::BidPlaced(_) => "bid_placed",
            AuctionEvent::Extended(_) => "auction_extended",
            AuctionEvent::Settled(_) => "auction_settled",
            AuctionEvent::Cancelled(_) => "auction_cancelled",
            AuctionEvent::Refunded(_) => "bid_refunded",
        }
    }
}
