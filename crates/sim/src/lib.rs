//! Pixelwar simulation core library.

pub mod config;
pub mod entity;
pub mod service;
pub mod solo;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use service::{GameService, SnapshotCallback};
pub use solo::SoloSession;
pub use state::GameState;
