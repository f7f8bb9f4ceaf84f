//! Gem Clicker: progression and economy engine for a browser idle clicker.
//!
//! The library owns the whole simulation: currency, generators and upgrades
//! with exponential prices, the gem health ladder, the combo multiplier, the
//! fixed-interval timers, and the save/load round trip. Rendering lives in
//! the binary; nothing here touches the DOM except [`storage::LocalStore`]
//! on wasm32.
//!
//! Everything is driven by millisecond timestamps handed in by the host, so
//! game logic is deterministic and testable without a real clock.

pub mod config;
pub mod format;
pub mod game;
pub mod storage;
pub mod time;

pub use config::{ClickPolicy, EngineConfig};
pub use format::format_number;
pub use game::GemGame;
pub use storage::{KeyValueStore, MemoryStore, StoreError};
