//! Per-guild channel restriction for game commands.
//!
//! Each guild may pin game commands to one channel. Every game-triggering
//! operation calls [`ChannelPolicy::check`] before mutating any state; a
//! mismatch rejects the command and names the expected channel so the reply
//! can mention it.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::info;

use crate::error::{GameError, StorageError};
use crate::player::{ChannelId, GuildId};

/// Durable guild -> restricted-channel mapping behind the policy.
pub trait SettingsBackend {
    /// Load all restrictions. Nothing stored yet loads as an empty map.
    fn load(&self) -> Result<HashMap<GuildId, ChannelId>, StorageError>;

    /// Replace the stored restrictions.
    fn save(&mut self, table: &HashMap<GuildId, ChannelId>) -> Result<(), StorageError>;
}

/// Settings persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    /// Use (or create on first save) the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsBackend for JsonFileSettings {
    fn load(&self) -> Result<HashMap<GuildId, ChannelId>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, table: &HashMap<GuildId, ChannelId>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory backend for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettings {
    table: HashMap<GuildId, ChannelId>,
}

impl SettingsBackend for MemorySettings {
    fn load(&self) -> Result<HashMap<GuildId, ChannelId>, StorageError> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &HashMap<GuildId, ChannelId>) -> Result<(), StorageError> {
        self.table = table.clone();
        Ok(())
    }
}

/// Gate-checks game commands against the per-guild channel restriction.
pub struct ChannelPolicy<B: SettingsBackend> {
    backend: Mutex<B>,
}

impl<B: SettingsBackend> ChannelPolicy<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// The restricted channel for a guild, if one is configured.
    pub fn restriction(&self, scope: GuildId) -> Result<Option<ChannelId>, StorageError> {
        let backend = self.backend.lock().expect("poisoned");
        Ok(backend.load()?.get(&scope).copied())
    }

    /// Set or clear (`None`) the restricted channel for a guild.
    pub fn set_restriction(
        &self,
        scope: GuildId,
        channel: Option<ChannelId>,
    ) -> Result<(), StorageError> {
        let mut backend = self.backend.lock().expect("poisoned");
        let mut table = backend.load()?;
        match channel {
            Some(channel) => {
                table.insert(scope, channel);
            }
            None => {
                table.remove(&scope);
            }
        }
        backend.save(&table)?;
        info!(%scope, ?channel, "game channel restriction updated");
        Ok(())
    }

    /// Ok if the guild has no restriction or `channel` matches it, otherwise
    /// [`GameError::ChannelRestricted`] naming the expected channel.
    pub fn check(&self, scope: GuildId, channel: ChannelId) -> Result<(), GameError> {
        match self.restriction(scope)? {
            Some(expected) if expected != channel => Err(GameError::ChannelRestricted(expected)),
            _ => Ok(()),
        }
    }
}
