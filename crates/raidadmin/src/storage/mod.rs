//! Storage abstraction for raids and queued broadcasts

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "memory")]
pub use memory::MemoryStorage;

use async_trait::async_trait;

use crate::error::Result;
use crate::message::QueuedBroadcast;
use crate::raid::{Raid, RaidId};

/// Change applied to a single raid while the storage holds it locked
pub type RaidUpdate = Box<dyn FnOnce(&mut Raid) + Send>;

/// Change applied to every raid in turn under one lock
pub type RaidsUpdate = Box<dyn FnMut(&mut Raid) + Send>;

/// Storage trait for raid persistence
#[async_trait]
pub trait RaidStorage: 'static + Sync + Send {
    /// Save a raid, replacing any raid with the same id
    async fn save_raid(&self, raid: &Raid) -> Result<()>;

    /// Get a raid by id
    async fn get_raid(&self, id: RaidId) -> Result<Raid>;

    /// Apply `apply` to the stored raid atomically and return the result
    ///
    /// No other update or save can interleave between reading the raid and
    /// writing it back.
    async fn update_raid(&self, id: RaidId, apply: RaidUpdate) -> Result<Raid>;

    /// Apply `apply` to every stored raid atomically, returning how many
    /// raids were updated
    async fn update_all_raids(&self, apply: RaidsUpdate) -> Result<usize>;

    /// List all raids ordered by id
    async fn list_raids(&self) -> Result<Vec<Raid>>;

    /// Append a broadcast to the outbox
    async fn queue_broadcast(&self, broadcast: QueuedBroadcast) -> Result<()>;

    /// Broadcasts waiting for delivery, oldest first
    async fn outbox(&self) -> Result<Vec<QueuedBroadcast>>;
}
