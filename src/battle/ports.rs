//! Contracts of the external collaborators a battle depends on
//!
//! Implementations live in `crate::llm`; tests plug in stubs.

use crate::core::error::Result;
use crate::entity::archetype::EnemyArchetype;
use crate::entity::character::CombatantSnapshot;
use async_trait::async_trait;
use std::sync::Arc;

/// Judge estimates, both in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionJudgment {
    pub feasibility: f64,
    pub potential_damage: f64,
}

impl ActionJudgment {
    pub fn new(feasibility: f64, potential_damage: f64) -> Self {
        Self {
            feasibility,
            potential_damage,
        }
    }

    /// Clamp both estimates into [0, 1]; NaN becomes 0
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(clamp(self.feasibility), clamp(self.potential_damage))
    }
}

/// Everything the judge and narrator see about one proposed action
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub is_hero_turn: bool,
    pub attacker: CombatantSnapshot,
    pub defender: CombatantSnapshot,
    pub proposed_action: String,
    /// Summary of recent turns, oldest first
    pub battle_history: String,
}

/// Name and description produced for a new enemy
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEnemy {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait ActionJudge: Send + Sync {
    /// Estimate feasibility and potential damage of the proposed action
    async fn judge(&self, context: &ActionContext) -> Result<ActionJudgment>;
}

#[async_trait]
pub trait ActionNarrator: Send + Sync {
    /// Describe what happened; callers fall back on failure
    async fn describe(
        &self,
        context: &ActionContext,
        judgment: &ActionJudgment,
        total_dmg: i64,
    ) -> Result<String>;
}

#[async_trait]
pub trait EnemyActionGenerator: Send + Sync {
    async fn generate_next_action(
        &self,
        enemy: &CombatantSnapshot,
        hero: &CombatantSnapshot,
        battle_history: &str,
    ) -> Result<String>;
}

#[async_trait]
pub trait EnemyGenerator: Send + Sync {
    async fn generate_enemy(&self, archetype: EnemyArchetype) -> Result<GeneratedEnemy>;
}

/// Collaborators shared by every battle of a session
#[derive(Clone)]
pub struct Collaborators {
    pub judge: Arc<dyn ActionJudge>,
    pub narrator: Arc<dyn ActionNarrator>,
    pub enemy_action_generator: Arc<dyn EnemyActionGenerator>,
    /// Without a generator every enemy comes from the fixed roster
    pub enemy_generator: Option<Arc<dyn EnemyGenerator>>,
}
