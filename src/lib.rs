//! Dig in Paris: dig down through banded ore, sell it at the surface shop,
//! upgrade your tools and recover all seven fossil pieces.

pub mod camera;
pub mod components;
pub mod constants;
pub mod economy;
pub mod hud;
pub mod mining;
pub mod player;
pub mod plugin;
pub mod session;
pub mod snapshot;
pub mod terrain;
pub mod tile_sprites;
pub mod tools;

pub use plugin::{SimulationPlugin, ViewPlugin};
pub use session::{GameEvent, GameSession, GameState, Intent, SessionConfig};
pub use snapshot::Snapshot;
