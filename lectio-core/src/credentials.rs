use anyhow::{anyhow, Context, Result};
use lectio_api::Credentials;
use std::sync::RwLock;
use tracing::info;

use crate::vault::Vault;

pub const SETTING_API_KEY: &str = "api_key";
pub const SETTING_COLLECTION_ID: &str = "bible_id";

/// The collection opened when nothing else is configured.
pub const DEFAULT_COLLECTION_ID: &str = "a93a92589195411f-01";

/// Values used when the Vault has nothing stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDefaults {
    pub api_key: String,
    pub collection_id: String,
}

impl Default for CredentialDefaults {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
        }
    }
}

impl CredentialDefaults {
    /// Built-in defaults overridden by `LECTIO_API_KEY` / `LECTIO_BIBLE_ID`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        Self {
            api_key: lookup("LECTIO_API_KEY").unwrap_or(base.api_key),
            collection_id: lookup("LECTIO_BIBLE_ID").unwrap_or(base.collection_id),
        }
    }
}

/// Process-wide API key and collection id, persisted in the Vault.
///
/// Callers take a snapshot with [`CredentialsStore::credentials`] and pass it to
/// the client. Changes only affect snapshots taken afterwards.
#[derive(Debug)]
pub struct CredentialsStore {
    vault: Vault,
    current: RwLock<Credentials>,
}

impl CredentialsStore {
    /// Load from the Vault, falling back to `defaults` per field.
    pub fn load(vault: Vault, defaults: &CredentialDefaults) -> Result<Self> {
        let api_key = vault
            .get_setting(SETTING_API_KEY)
            .context("Failed to read stored API key")?
            .unwrap_or_else(|| defaults.api_key.clone());
        let collection_id = vault
            .get_setting(SETTING_COLLECTION_ID)
            .context("Failed to read stored bible id")?
            .unwrap_or_else(|| defaults.collection_id.clone());

        Ok(Self {
            vault,
            current: RwLock::new(Credentials::new(api_key, collection_id)),
        })
    }

    /// A snapshot of the current credentials.
    pub fn credentials(&self) -> Credentials {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        self.vault
            .set_setting(SETTING_API_KEY, key)
            .context("Failed to persist API key")?;
        self.write()?.api_key = key.to_string();
        info!("API key updated");
        Ok(())
    }

    pub fn set_collection_id(&self, id: &str) -> Result<()> {
        let id = id.trim();
        self.vault
            .set_setting(SETTING_COLLECTION_ID, id)
            .context("Failed to persist bible id")?;
        self.write()?.collection_id = id.to_string();
        info!(collection_id = id, "Bible collection updated");
        Ok(())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Credentials>> {
        self.current
            .write()
            .map_err(|_| anyhow!("credentials lock poisoned"))
    }
}
