//! Ed25519 signing and verification of authorization envelopes.
//!
//! Authorizers hold Ed25519 signing keys. An envelope carries the signer's
//! public key, a fresh nonce, an absolute deadline, and the signature over
//! one schema digest. Verification recomputes nothing about membership or
//! replay; it only authenticates the digest against the envelope's key and
//! returns the signing identity. Deadline, authorizer-set membership, and
//! nonce consumption are the engine's responsibility, enforced in the same
//! atomic action.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;

use auction_types::{Address, AuthorizationEnvelope, Nonce};

use crate::error::CryptoError;

/// Generate a fresh random nonce for a new authorization.
pub fn generate_nonce() -> Nonce {
    let mut nonce = [0u8; 32];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Generate a new authorizer signing key.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// The 32-byte identity of a signing key's public half.
pub fn identity_of(key: &SigningKey) -> Address {
    key.verifying_key().to_bytes()
}

/// Sign a schema digest, producing a complete authorization envelope.
///
/// # Arguments
/// * `key` - The authorizer's signing key
/// * `digest` - Output of one of the schema functions, computed over the
///   same `nonce` and `deadline` passed here
/// * `nonce` - Single-use value bound into the digest
/// * `deadline` - Absolute expiry bound into the digest
pub fn sign_envelope(
    key: &SigningKey,
    digest: &[u8; 32],
    nonce: Nonce,
    deadline: u64,
) -> AuthorizationEnvelope {
    let signature: Signature = key.sign(digest);
    AuthorizationEnvelope {
        authorizer: key.verifying_key().to_bytes(),
        nonce,
        deadline,
        signature: signature.to_bytes(),
    }
}

/// Verify an envelope's signature over a schema digest.
///
/// # Arguments
/// * `digest` - The recomputed schema digest for the submitted action
/// * `envelope` - The authorization attached to the call
///
/// # Returns
/// The authenticated signing identity on success. The caller must still
/// check deadline, authorizer-set membership, and nonce freshness.
pub fn verify_envelope(
    digest: &[u8; 32],
    envelope: &AuthorizationEnvelope,
) -> Result<Address, CryptoError> {
    let key = VerifyingKey::from_bytes(&envelope.authorizer)
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature = Signature::from_bytes(&envelope.signature);

    key.verify_strict(digest, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)?;

    Ok(envelope.authorizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{bid_digest, cancel_digest};

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let key = generate_signing_key();
        let nonce = generate_nonce();
        let digest = bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_000, &nonce, 100);

        let envelope = sign_envelope(&key, &digest, nonce, 100);
        let identity = verify_envelope(&digest, &envelope).unwrap();

        assert_eq!(identity, identity_of(&key));
    }

    #[test]
    fn test_wrong_digest_fails() {
        let key = generate_signing_key();
        let nonce = generate_nonce();
        let digest = bid_digest(&[1u8; 32], &[2u8; 32], 7, 1_000_000, &nonce, 100);
        let envelope = sign_envelope(&key, &digest, nonce, 100);

        // Same fields under a different schema never verifies
        let other = cancel_digest(&[1u8; 32], &nonce, 100);
        assert!(matches!(
            verify_envelope(&other, &envelope),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let key = generate_signing_key();
        let nonce = generate_nonce();
        let digest = cancel_digest(&[1u8; 32], &nonce, 100);

        let mut envelope = sign_envelope(&key, &digest, nonce, 100);
        envelope.signature[0] ^= 0x01;

        assert!(verify_envelope(&digest, &envelope).is_err());
    }

    #[test]
    fn test_substituted_signer_fails() {
        let key = generate_signing_key();
        let other = generate_signing_key();
        let nonce = generate_nonce();
        let digest = cancel_digest(&[1u8; 32], &nonce, 100);

        // Claiming someone else's identity over a valid signature fails
        let mut envelope = sign_envelope(&key, &digest, nonce, 100);
        envelope.authorizer = identity_of(&other);

        assert!(verify_envelope(&digest, &envelope).is_err());
    }
}
