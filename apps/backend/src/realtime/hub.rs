use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use uuid::Uuid;

use crate::domain::game::GameId;
use crate::protocol::EventEnvelope;

/// A live feed of one game's events. Dropping the receiver ends it; the hub
/// prunes the sender, and the game's entry once it has no senders left, on
/// the next publish.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub receiver: UnboundedReceiver<EventEnvelope>,
}

#[derive(Debug, Default)]
pub struct GameEventHub {
    subscribers: DashMap<GameId, DashMap<Uuid, UnboundedSender<EventEnvelope>>>,
}

impl GameEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, game_id: &str) -> Subscription {
        let (tx, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.subscribers
            .entry(game_id.to_string())
            .or_default()
            .insert(id, tx);
        debug!(game_id, subscriber = %id, "Subscribed to game events");
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&self, game_id: &str, id: Uuid) {
        if let Some(entry) = self.subscribers.get(game_id) {
            entry.remove(&id);
        }
        self.subscribers
            .remove_if(game_id, |_, subs| subs.is_empty());
    }

    /// Deliver `events` in order to every live subscriber of `game_id`.
    ///
    /// Callers publish while holding the game's lock, so per-game delivery
    /// order equals command completion order.
    pub fn publish(&self, game_id: &str, events: &[EventEnvelope]) -> usize {
        let live = {
            let Some(entry) = self.subscribers.get(game_id) else {
                return 0;
            };
            let mut closed = Vec::new();
            for sub in entry.iter() {
                let delivered = events.iter().all(|e| sub.value().send(e.clone()).is_ok());
                if !delivered {
                    closed.push(*sub.key());
                }
            }
            for id in &closed {
                entry.remove(id);
                debug!(game_id, subscriber = %id, "Pruned closed subscriber");
            }
            entry.len()
        };
        if live == 0 {
            self.subscribers
                .remove_if(game_id, |_, subs| subs.is_empty());
        }
        live
    }

    /// Games with at least one registered subscriber.
    pub fn game_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscriber_count(&self, game_id: &str) -> usize {
        self.subscribers.get(game_id).map_or(0, |e| e.len())
    }
}
