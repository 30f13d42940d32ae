use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RaidStorage, RaidUpdate, RaidsUpdate};
use crate::error::{AdminError, Result};
use crate::message::QueuedBroadcast;
use crate::raid::{Raid, RaidId};

/// In-memory storage, used by the server and in tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raids: RwLock<BTreeMap<RaidId, Raid>>,
    outbox: RwLock<Vec<QueuedBroadcast>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage preloaded with raids
    pub fn with_raids(raids: impl IntoIterator<Item = Raid>) -> Self {
        let raids = raids.into_iter().map(|raid| (raid.id, raid)).collect();
        Self {
            raids: RwLock::new(raids),
            outbox: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RaidStorage for MemoryStorage {
    async fn save_raid(&self, raid: &Raid) -> Result<()> {
        self.raids.write().await.insert(raid.id, raid.clone());
        Ok(())
    }

    async fn get_raid(&self, id: RaidId) -> Result<Raid> {
        self.raids
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AdminError::RaidNotFound(id.0))
    }

    async fn update_raid(&self, id: RaidId, apply: RaidUpdate) -> Result<Raid> {
        let mut raids = self.raids.write().await;
        let raid = raids.get_mut(&id).ok_or(AdminError::RaidNotFound(id.0))?;
        apply(raid);
        Ok(raid.clone())
    }

    async fn update_all_raids(&self, mut apply: RaidsUpdate) -> Result<usize> {
        let mut raids = self.raids.write().await;
        for raid in raids.values_mut() {
            apply(raid);
        }
        Ok(raids.len())
    }

    async fn list_raids(&self) -> Result<Vec<Raid>> {
        Ok(self.raids.read().await.values().cloned().collect())
    }

    async fn queue_broadcast(&self, broadcast: QueuedBroadcast) -> Result<()> {
        self.outbox.write().await.push(broadcast);
        Ok(())
    }

    async fn outbox(&self) -> Result<Vec<QueuedBroadcast>> {
        Ok(self.outbox.read().await.clone())
    }
}
