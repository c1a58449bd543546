//! Vault configuration.
//!
//! The production KDF profile is fixed (Argon2id, 64 MiB, 3 passes, 4 lanes).
//! It is still carried as data so test suites and benches can run a cheaper
//! profile without a separate code path.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl KdfParams {
    /// Memory cost of the production profile (64 MiB).
    pub const MEMORY_KIB: u32 = 65_536;
    /// Passes of the production profile.
    pub const ITERATIONS: u32 = 3;
    /// Lanes of the production profile.
    pub const PARALLELISM: u32 = 4;

    /// A deliberately weak profile for tests and benches. Never use for real vaults.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Reject parameters Argon2 cannot run with.
    pub fn validate(&self) -> Result<()> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, Some(32))
            .map(|_| ())
            .map_err(|e| VaultError::Config(format!("argon2 parameters: {e}")))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: Self::MEMORY_KIB,
            iterations: Self::ITERATIONS,
            parallelism: Self::PARALLELISM,
        }
    }
}

fn default_weak_password_len() -> usize {
    10
}

/// Top-level configuration for a [`crate::Vault`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Key derivation cost profile.
    #[serde(default)]
    pub kdf: KdfParams,

    /// Stored passwords shorter than this count as weak in the security report.
    #[serde(default = "default_weak_password_len")]
    pub weak_password_len: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            weak_password_len: default_weak_password_len(),
        }
    }
}

impl VaultConfig {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VaultError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VaultError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()
    }
}
