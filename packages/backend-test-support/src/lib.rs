//! Backend test support utilities
//!
//! Shared by the backend's integration tests: one-time logging setup and
//! unique identifiers so tests sharing a process never share a game.

pub mod logging;
pub mod unique_helpers;
