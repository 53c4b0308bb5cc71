//! Client SDK for content-collectible auctions.
//!
//! This crate provides the authorizer side of the capability scheme:
//! key handling and construction of signed envelopes for starting,
//! bidding on, and cancelling auctions.

pub mod auth;

pub use auth::{authorize_bid, authorize_cancel, authorize_start, parse_signing_key, AuthError};
