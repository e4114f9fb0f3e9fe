//! Enemy archetypes controlling stat growth

use crate::core::config::{EnemyArchetypesLevelingAttributeProbs, LevelingAttributeProbs};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stat-growth bias of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyArchetype {
    /// Levels mostly into attack
    Attacker,
    /// Levels mostly into defense
    Defender,
    /// Levels mostly into max hp
    Tank,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 3] = [Self::Attacker, Self::Defender, Self::Tank];

    /// Leveling weights for this archetype
    pub fn leveling_probs<'a>(
        &self,
        probs: &'a EnemyArchetypesLevelingAttributeProbs,
    ) -> &'a LevelingAttributeProbs {
        match self {
            Self::Attacker => &probs.attacker,
            Self::Defender => &probs.defender,
            Self::Tank => &probs.tank,
        }
    }

    /// Uniformly random archetype
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for EnemyArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Attacker => "attacker",
            Self::Defender => "defender",
            Self::Tank => "tank",
        };
        f.write_str(label)
    }
}
