//! Session flow around battles

pub mod resting_hub;
pub mod roster;
pub mod session;

pub use resting_hub::RestingHub;
pub use roster::{roster_enemy, ROSTER};
pub use session::{Game, GameScene, GameSceneKind};
