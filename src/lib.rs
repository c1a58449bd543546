//! # zkvault
//!
//! Zero-knowledge secret vault engine.
//!
//! A user's credentials are encrypted under keys derived solely from a
//! password the storage layer never sees. Items can be shared with other
//! users through hybrid envelope encryption, again without exposing
//! plaintext or long-lived keys to storage.
//!
//! ```text
//! password --Argon2id--> KEK --unwrap--> master key --AES-256-GCM--> items
//!                           \--unwrap--> RSA private key
//! share: item --MK--> plaintext --one-time key--> shared data
//!                                 one-time key --recipient RSA-OAEP--> shared key
//! ```
//!
//! ## Public API
//!
//! [`Vault`] is the entry point for applications: it drives the services
//! below against a [`store::VaultStore`]. The services are public for
//! callers that manage persistence themselves:
//!
//! - [`kdf`]: password + salt to KEK
//! - [`crypto`]: authenticated symmetric encryption
//! - [`master`] and [`session`]: master key lifecycle and lock state
//! - [`asymmetric`]: sharing key pair generation, export and import
//! - [`codec`]: item payload encoding and per-item sealing
//! - [`sharing`]: share and receive
//!
//! One KEK wraps both the master key and the sharing private key, so the
//! password alone opens both.

pub mod asymmetric;
pub mod audit;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod health;
pub mod kdf;
pub mod keys;
pub mod master;
pub mod records;
pub mod session;
pub mod sharing;
pub mod store;
pub mod vault;

pub use codec::{ItemFields, OpenedItem};
pub use config::{KdfParams, VaultConfig};
pub use error::{Result, VaultError};
pub use keys::MasterKey;
pub use master::generate_master_key;
pub use session::{Session, SessionState};
pub use vault::{Identity, ReceivedItem, Vault};
