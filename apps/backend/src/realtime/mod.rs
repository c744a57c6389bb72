//! In-process fan-out of sequenced game events.

pub mod hub;

pub use hub::{GameEventHub, Subscription};
