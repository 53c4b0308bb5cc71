//! Core auction engine: lifecycle state machine, escrow accounting, and
//! authorization checks for content-collectible auctions.
//!
//! # Architecture
//!
//! - `call`: state-changing call types submitted through the host
//! - `handlers`: business logic, one handler per call plus `dispatch`
//! - `queries`: read-only state access with derived fields
//! - `state`: engine state and its bookkeeping helpers
//! - `assets`: escrow and minting seams with in-memory implementations
//! - `events`: observable records emitted by successful calls
//! - `genesis`: initial configuration and validation
//! - `error`: error taxonomy for every rejected call
//!
//! The engine is host-agnostic: it never reads a clock or a network. The
//! host reads the time once per call, takes exclusive access to the state
//! and asset ledger, and applies calls through [`dispatch`].

pub mod assets;
pub mod call;
pub mod error;
pub mod events;
pub mod genesis;
pub mod handlers;
pub mod queries;
pub mod state;

pub use assets::{AssetError, CollectibleMinter, LedgerAsset, MintBook, MintError, StableAsset};
pub use call::AuctionCall;
pub use error::AuctionError;
pub use events::AuctionEvent;
pub use genesis::{check_config, AuctionGenesisConfig, GenesisValidationError};
pub use handlers::{dispatch, CallContext, HandlerResult};
pub use queries::{handle_query, AuctionQuery, AuctionQueryResponse, AuctionSummary, ConfigInfo};
pub use state::EngineState;
