//! Characters, stats, and equipment

pub mod archetype;
pub mod character;
pub mod enemy;
pub mod hero;
pub mod inventory;
pub mod item;
pub mod stats;

pub use archetype::EnemyArchetype;
pub use character::{Character, Combatant, CombatantSnapshot};
pub use enemy::Enemy;
pub use hero::{Hero, HeroClass, HeroClassKind};
pub use inventory::Inventory;
pub use item::{Item, ItemRef};
pub use stats::Stats;
