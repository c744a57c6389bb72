//! Repository traits for domain layer.

pub mod games;

pub use games::GameRepository;
