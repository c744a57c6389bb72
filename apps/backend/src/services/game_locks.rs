//! Per-game mutual exclusion for read-modify-write command handling.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::game::GameId;

/// Entries live only while someone holds or waits on them.
#[derive(Debug, Default)]
pub struct GameLockRegistry {
    locks: DashMap<GameId, Arc<Mutex<()>>>,
}

/// Exclusive access to one game. Dropping it unlocks and evicts the entry
/// when nobody else is queued on it.
#[derive(Debug)]
pub struct GameLockGuard<'a> {
    registry: &'a GameLockRegistry,
    game_id: GameId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.registry.evict_idle(&self.game_id);
    }
}

impl GameLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `game_id`. Different ids never contend.
    pub async fn acquire(&self, game_id: &str) -> GameLockGuard<'_> {
        let lock = self
            .locks
            .entry(game_id.to_string())
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;
        GameLockGuard {
            registry: self,
            game_id: game_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Waiters hold a clone of the `Arc`, and `acquire` clones under the
    /// shard lock, so a count of one means no holder and no waiter.
    fn evict_idle(&self, game_id: &str) {
        self.locks
            .remove_if(game_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
