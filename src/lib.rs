//! Engines for a tile-based tactical encounter: turn alternation, AI action
//! resolution, collision-aware movement and stat/effect bookkeeping, driven
//! tick by tick by an ordered subsystem orchestrator.

pub mod ai;
pub mod config;
pub mod ecs;
pub mod event_bus;
pub mod game_loop;
pub mod map;
pub mod movement;
pub mod personality;
pub mod services;
pub mod stats;
pub mod systems;
pub mod turn_system;
pub mod vfx;

pub use config::{ConfigFile, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use game_loop::Encounter;
