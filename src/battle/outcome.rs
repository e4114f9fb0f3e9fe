//! Result of one thinking phase

use crate::battle::log::BattleEvent;
use crate::battle::ports::ActionJudgment;
use crate::combat::damage::DamageCalculationResult;

pub const FAILED_PROPOSED_ACTION: &str = "...";
pub const FAILED_EFFECT_DESCRIPTION: &str = "The action failed.";

/// What a hero or enemy action amounted to
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub is_hero_turn: bool,
    pub character_name: String,
    pub proposed_action: String,
    pub effect_description: String,
    pub judgment: ActionJudgment,
    pub damage: DamageCalculationResult,
    /// Set when a collaborator failed or the phase timed out
    pub error: Option<String>,
}

impl ActionOutcome {
    /// Zero-damage outcome standing in for a failed or timed-out phase
    pub fn failed(is_hero_turn: bool, character_name: &str, reason: impl Into<String>) -> Self {
        Self {
            is_hero_turn,
            character_name: character_name.to_string(),
            proposed_action: FAILED_PROPOSED_ACTION.to_string(),
            effect_description: FAILED_EFFECT_DESCRIPTION.to_string(),
            judgment: ActionJudgment::default(),
            damage: DamageCalculationResult::default(),
            error: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn total_dmg(&self) -> i64 {
        self.damage.total_dmg
    }

    pub fn to_event(&self) -> BattleEvent {
        BattleEvent {
            is_hero_turn: self.is_hero_turn,
            character_name: self.character_name.clone(),
            proposed_action: self.proposed_action.clone(),
            effect_description: self.effect_description.clone(),
            damage_calculation_result: self.damage.clone(),
        }
    }
}
