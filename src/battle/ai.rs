//! Judge → damage → narrate pipeline for one action

use crate::battle::outcome::ActionOutcome;
use crate::battle::ports::{ActionContext, ActionJudge, ActionNarrator};
use crate::combat::damage::{DamageCalculator, DamageInputs};
use crate::core::error::{Result, RpgError};
use crate::entity::item::ItemRef;
use rand::Rng;
use std::sync::Arc;

/// Inputs of one action resolution, owned so it can move to a worker
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub context: ActionContext,
    pub n_new_words_in_action: u32,
    pub n_overused_words_in_action: u32,
    pub answer_speed_s: f64,
    /// Attacker items; empty for enemies
    pub items: Vec<ItemRef>,
}

pub struct BattleAi {
    judge: Arc<dyn ActionJudge>,
    narrator: Arc<dyn ActionNarrator>,
    damage_calculator: DamageCalculator,
}

impl BattleAi {
    pub fn new(
        judge: Arc<dyn ActionJudge>,
        narrator: Arc<dyn ActionNarrator>,
        damage_calculator: DamageCalculator,
    ) -> Self {
        Self {
            judge,
            narrator,
            damage_calculator,
        }
    }

    /// Judge the action, compute its damage, then narrate it
    ///
    /// Judge failures propagate as `RpgError::Collaborator`; narrator failures fall back to a plain
    /// description so damage is never lost.
    pub async fn resolve_action<R: Rng>(
        &self,
        request: &ActionRequest,
        rng: &mut R,
    ) -> Result<ActionOutcome> {
        let context = &request.context;
        let judgment = self
            .judge
            .judge(context)
            .await
            .map_err(|e| RpgError::Collaborator(format!("action judge: {}", e)))?
            .clamped();

        let inputs = DamageInputs {
            attack: context.attacker.stats.attack,
            defense: context.defender.stats.defense,
            feasibility: judgment.feasibility,
            potential_damage: judgment.potential_damage,
            n_new_words_in_action: request.n_new_words_in_action,
            n_overused_words_in_action: request.n_overused_words_in_action,
            answer_speed_s: request.answer_speed_s,
        };
        let damage = self
            .damage_calculator
            .calculate_damage(&inputs, &request.items, rng);

        let effect_description = match self
            .narrator
            .describe(context, &judgment, damage.total_dmg)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => fallback_description(context),
            Err(e) => {
                tracing::warn!(error = %e, "Narration failed, using fallback");
                fallback_description(context)
            }
        };

        Ok(ActionOutcome {
            is_hero_turn: context.is_hero_turn,
            character_name: context.attacker.name.clone(),
            proposed_action: context.proposed_action.clone(),
            effect_description,
            judgment,
            damage,
            error: None,
        })
    }
}

fn fallback_description(context: &ActionContext) -> String {
    format!("{}: {}", context.attacker.name, context.proposed_action)
}
