//! Engine input and output: commands in, sequenced events out.

pub mod commands;
pub mod events;

pub use commands::{CommandKind, GameCommand};
pub use events::{EventEnvelope, GameEvent, NextState, SuggestedAction, YakuUpdate};
