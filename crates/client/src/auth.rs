//! Capability envelope construction.
//!
//! An authorizer holds an Ed25519 signing key whose verifying key is
//! registered with the engine. Each envelope binds one action's exact
//! values together with a fresh random nonce and an absolute deadline.

use ed25519_dalek::SigningKey;
use thiserror::Error;

use auction_crypto::{bid_digest, cancel_digest, generate_nonce, sign_envelope, start_digest};
use auction_types::{Address, AuctionParams, AuthorizationEnvelope, ContentId};

/// Errors from key handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid signing key hex: {0}")]
    InvalidKeyHex(String),

    #[error("Signing key must be 32 bytes")]
    InvalidKeyLength,
}

/// Parse an Ed25519 signing key from its hex-encoded secret bytes.
pub fn parse_signing_key(s: &str) -> Result<SigningKey, AuthError> {
    let bytes: [u8; 32] = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| AuthError::InvalidKeyHex(e.to_string()))?
        .try_into()
        .map_err(|_| AuthError::InvalidKeyLength)?;
    Ok(SigningKey::from_bytes(&bytes))
}

/// Authorize starting an auction with its opening bid.
///
/// # Arguments
/// * `key` - Registered authorizer signing key
/// * `content_id` - Content the auction is for
/// * `creator` - Payout address of the content's creator
/// * `creator_id` - Numeric account id of the creator
/// * `bidder` - Address that will submit the call and escrow the bid
/// * `bidder_id` - Numeric account id of the opening bidder
/// * `amount` - Opening bid amount
/// * `params` - Per-auction rules, frozen at start
/// * `deadline` - Absolute expiry of this authorization (Unix seconds)
///
/// # Returns
/// A single-use envelope bound to exactly these values
#[allow(clippy::too_many_arguments)]
pub fn authorize_start(
    key: &SigningKey,
    content_id: &ContentId,
    creator: &Address,
    creator_id: u64,
    bidder: &Address,
    bidder_id: u64,
    amount: u64,
    params: &AuctionParams,
    deadline: u64,
) -> AuthorizationEnvelope {
    let nonce = generate_nonce();
    let digest = start_digest(
        content_id, creator, creator_id, bidder, bidder_id, amount, params, &nonce, deadline,
    );
    sign_envelope(key, &digest, nonce, deadline)
}

/// Authorize one bid of `amount` by `bidder` on `content_id`.
pub fn authorize_bid(
    key: &SigningKey,
    content_id: &ContentId,
    bidder: &Address,
    bidder_id: u64,
    amount: u64,
    deadline: u64,
) -> AuthorizationEnvelope {
    let nonce = generate_nonce();
    let digest = bid_digest(content_id, bidder, bidder_id, amount, &nonce, deadline);
    sign_envelope(key, &digest, nonce, deadline)
}

/// Authorize cancelling the auction for `content_id`.
pub fn authorize_cancel(
    key: &SigningKey,
    content_id: &ContentId,
    deadline: u64,
) -> AuthorizationEnvelope {
    let nonce = generate_nonce();
    let digest = cancel_digest(content_id, &nonce, deadline);
    sign_envelope(key, &digest, nonce, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_crypto::{generate_signing_key, identity_of, verify_envelope};

    #[test]
    fn test_parse_signing_key_round_trip() {
        let key = generate_signing_key();
        let parsed = parse_signing_key(&hex::encode(key.to_bytes())).unwrap();
        assert_eq!(identity_of(&parsed), identity_of(&key));

        assert!(matches!(
            parse_signing_key("zz"),
            Err(AuthError::InvalidKeyHex(_))
        ));
        assert!(matches!(
            parse_signing_key("aabb"),
            Err(AuthError::InvalidKeyLength)
        ));
    }

    #[test]
    fn test_authorized_bid_verifies() {
        let key = generate_signing_key();
        let content_id = [42u8; 32];
        let bidder = [1u8; 32];

        let envelope = authorize_bid(&key, &content_id, &bidder, 11, 1_000_000, 500);
        assert_eq!(envelope.authorizer, identity_of(&key));
        assert_eq!(envelope.deadline, 500);

        let digest = bid_digest(&content_id, &bidder, 11, 1_000_000, &envelope.nonce, 500);
        assert_eq!(verify_envelope(&digest, &envelope).unwrap(), identity_of(&key));
    }

    #[test]
    fn test_each_envelope_gets_a_fresh_nonce() {
        let key = generate_signing_key();
        let content_id = [42u8; 32];

        let first = authorize_cancel(&key, &content_id, 500);
        let second = authorize_cancel(&key, &content_id, 500);
        assert_ne!(first.nonce, second.nonce);
    }
}
