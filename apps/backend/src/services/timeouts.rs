//! Cancellable per-game action timers.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::game::GameId;

#[derive(Debug)]
struct PendingTimeout {
    marker: u64,
    token: CancellationToken,
}

/// At most one armed timer per game, keyed by the game's action marker.
///
/// Arming and cancelling happen while the game lock is held. A timer that
/// fires re-enters through the locked command path and must check that the
/// game's marker still equals the one it was armed with.
#[derive(Debug, Default)]
pub struct TimeoutManager {
    pending: Mutex<HashMap<GameId, PendingTimeout>>,
}

impl TimeoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer for `game_id`, replacing (and cancelling) any previous one.
    pub fn schedule<F, Fut>(&self, game_id: &str, marker: u64, delay: Duration, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let previous = self.pending.lock().insert(
            game_id.to_string(),
            PendingTimeout {
                marker,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.token.cancel();
        }
        debug!(game_id, marker, delay_ms = delay.as_millis() as u64, "Timeout armed");
        Self::spawn_timer(token, delay, on_fire);
    }

    /// Arm a timer only if none is armed for `game_id`. Returns whether it was armed.
    pub fn schedule_if_idle<F, Fut>(
        &self,
        game_id: &str,
        marker: u64,
        delay: Duration,
        on_fire: F,
    ) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        {
            let mut pending = self.pending.lock();
            if pending.contains_key(game_id) {
                return false;
            }
            pending.insert(
                game_id.to_string(),
                PendingTimeout {
                    marker,
                    token: token.clone(),
                },
            );
        }
        debug!(game_id, marker, delay_ms = delay.as_millis() as u64, "Timeout retry armed");
        Self::spawn_timer(token, delay, on_fire);
        true
    }

    fn spawn_timer<F, Fut>(token: CancellationToken, delay: Duration, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => on_fire().await,
            }
        });
    }

    pub fn cancel(&self, game_id: &str) {
        if let Some(previous) = self.pending.lock().remove(game_id) {
            previous.token.cancel();
            debug!(game_id, marker = previous.marker, "Timeout cancelled");
        }
    }

    /// Forget the entry if it is still the one armed with `marker`.
    pub fn clear_fired(&self, game_id: &str, marker: u64) {
        let mut pending = self.pending.lock();
        if pending.get(game_id).is_some_and(|p| p.marker == marker) {
            pending.remove(game_id);
        }
    }

    pub fn pending_marker(&self, game_id: &str) -> Option<u64> {
        self.pending.lock().get(game_id).map(|p| p.marker)
    }
}
