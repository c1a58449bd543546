//! Error types for zkvault.
//!
//! Every variant is a distinct failure mode of the vault engine. Messages
//! are intentionally minimal: they signal *what* failed without revealing
//! *why* in ways that could leak cryptographic state. In particular a wrong
//! key and a tampered ciphertext produce the same error.

use thiserror::Error;

/// Opaque error returned by a storage collaborator. Passed through unchanged.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VaultError>;

/// The single error type for all zkvault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The wrapped master key could not be opened with the derived KEK.
    /// Wrong password and corrupted profile are indistinguishable.
    #[error("invalid password")]
    InvalidPassword,

    /// AEAD or RSA-OAEP decryption failed: wrong key, tampered ciphertext,
    /// tampered nonce or truncated input.
    #[error("decryption failed")]
    DecryptionFailure,

    /// Encryption failed inside the primitive.
    #[error("encryption failed")]
    EncryptionFailure,

    /// A key had the wrong length or could not be loaded by the primitive.
    #[error("invalid key")]
    InvalidKey,

    /// The system random number generator failed to produce bytes.
    #[error("randomness source failed")]
    RandomnessFailure,

    /// Argon2id rejected its parameters or inputs.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The sharing key pair could not be generated or serialized.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// An item or sharing operation was attempted without a resident master key.
    #[error("vault is locked")]
    VaultLocked,

    /// A received share was opened without a resident private key.
    #[error("sharing key unavailable")]
    SharingKeyUnavailable,

    /// The sharing target has no profile or no registered public key.
    #[error("recipient not found or sharing not enabled: {0}")]
    RecipientNotFound(String),

    /// No item with that id is visible to the caller.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The caller has no vault profile yet.
    #[error("vault profile not found")]
    ProfileNotFound,

    /// A vault profile already exists for the caller.
    #[error("vault already initialized")]
    AlreadyInitialized,

    /// Another profile is already registered under this email.
    #[error("email already registered: {0}")]
    EmailInUse(String),

    /// Decrypted bytes did not parse into the expected structure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored value (base64, key DER) was malformed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Configuration could not be loaded or is not usable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reported by the storage collaborator.
    #[error(transparent)]
    Storage(StoreError),
}

impl VaultError {
    /// Whether the failure came from a cryptographic check rather than
    /// from state, input shape or storage.
    pub fn is_cryptographic(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassword | Self::DecryptionFailure | Self::EncryptionFailure
        )
    }
}
