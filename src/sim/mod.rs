//! Deterministic game logic
//!
//! All gameplay state lives here. This module must stay pure and deterministic:
//! - Explicit tick(dt) scheduling only, no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod dot;
pub mod session;

pub use dot::Dot;
pub use session::{GameEvent, GameOverReason, GamePhase, GameSession};
