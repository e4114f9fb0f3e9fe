//! Damage resolution, vocabulary tracking, and enemy scaling

pub mod boost;
pub mod creativity;
pub mod damage;
pub mod scaling;

pub use boost::{BonusMultiplier, LlmScalingBoost, LlmScalingBoostKind, ProcCondition, ProcReason};
pub use creativity::CreativityTracker;
pub use damage::{DamageCalculationResult, DamageCalculator, DamageInputs};
pub use scaling::{scale_enemy, scaled_level};
