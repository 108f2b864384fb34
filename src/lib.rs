//! Snake minigame - the arcade Snake that pops up over a page
//!
//! This library provides:
//! - Core game logic, host-independent (game module)
//! - Key and window-control mapping (input module)
//! - TUI rendering (render module)
//! - Round statistics for the status line (metrics module)
//! - The terminal host that runs it all (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
