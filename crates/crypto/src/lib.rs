//! Authorization cryptography for collectible content auctions.
//!
//! This crate implements the capability-token scheme that gates every
//! auction action: an off-chain authorizer signs a canonical digest of the
//! action's exact parameters, and the engine verifies the signature before
//! touching any state.
//!
//! # Overview
//!
//! The authorization scheme works as follows:
//!
//! 1. **Schema digest**: Each action (Start, Bid, Cancel) has a canonical
//!    SHA-256 digest with its own ASCII domain prefix, covering the bound
//!    fields plus the envelope's nonce and deadline. Distinct prefixes mean
//!    a signature for one action can never satisfy another.
//!
//! 2. **Signing**: An authorizer signs the digest with an Ed25519 key,
//!    producing an [`auction_types::AuthorizationEnvelope`] carrying the
//!    public key, nonce, deadline, and signature.
//!
//! 3. **Verification**: The engine recomputes the digest from the submitted
//!    call, verifies the signature, and receives the authenticated signing
//!    identity. Deadline expiry, authorizer-set membership, and single-use
//!    nonce consumption are then enforced inside the same atomic action.

pub mod error;
pub mod schema;
pub mod signing;

pub use error::CryptoError;
pub use schema::{bid_digest, cancel_digest, start_digest};
pub use signing::{
    generate_nonce, generate_signing_key, identity_of, sign_envelope, verify_envelope,
};
