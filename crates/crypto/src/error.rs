//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during authorization cryptography.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid public key encoding")]
    InvalidPublicKey,

    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
