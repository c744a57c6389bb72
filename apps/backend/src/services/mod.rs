pub mod deck_provider;
pub mod game_flow;
pub mod game_locks;
pub mod timeouts;

pub use game_flow::{GameFlowService, JoinResult};
