//! Core game logic module for Snake
//!
//! Everything here is host-independent: viewport sizes, key names and timer
//! ticks come in as plain values, so the whole game can be driven from tests
//! without a terminal.

pub mod config;
pub mod direction;
pub mod engine;
pub mod geometry;
pub mod session;
pub mod state;
pub mod ticker;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepResult};
pub use geometry::{GridGeometry, Viewport};
pub use session::{CloseCallback, SnakeSession};
pub use state::{CollisionType, GameState, Position, Snake};
pub use ticker::{TickDriver, TickPhase, TickTransition};
