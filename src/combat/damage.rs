//! Damage resolution pipeline
//!
//! Turns the judge's feasibility and potential damage estimates plus the
//! attacker's stats, items, and typing signals into a bounded integer
//! damage value. Every intermediate is stored in the result so a turn can
//! be audited (and recomputed) from the record alone.
//!
//! Order of operations:
//! 1. random factor
//! 2. stat-based base damage, floored at 1
//! 3. feasibility boosts folded over the items in order
//! 4. potential damage boosts, same fold
//! 5. LLM scaling = impact × feasibility × potential damage
//! 6. scaled base damage, rounded up
//! 7. procced bonus multipliers, each rounded away from zero
//! 8. total, floored at 0

use crate::combat::boost::{BonusMultiplier, LlmScalingBoost};
use crate::core::config::DamageCalculationConfig;
use crate::entity::item::ItemRef;
use rand::Rng;
use serde::Serialize;
use std::fmt::Write;

/// Numeric inputs of one damage calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInputs {
    pub attack: i32,
    pub defense: i32,
    /// Judge estimate in [0, 1]
    pub feasibility: f64,
    /// Judge estimate in [0, 1]
    pub potential_damage: f64,
    pub n_new_words_in_action: u32,
    pub n_overused_words_in_action: u32,
    pub answer_speed_s: f64,
}

/// A procced multiplier and the damage it contributed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusMultiplierImpact {
    pub bonus_multiplier: BonusMultiplier,
    pub damage_impact: i64,
}

/// Audit trail of one damage calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamageCalculationResult {
    pub attack: i32,
    pub defense: i32,
    pub random_factor: f64,
    pub base_dmg: f64,
    pub feasibility: f64,
    pub potential_damage: f64,
    pub boosted_feasibility: f64,
    pub boosted_potential_damage: f64,
    pub applied_feasibility_boosts: Vec<LlmScalingBoost>,
    pub applied_potential_damage_boosts: Vec<LlmScalingBoost>,
    pub llm_dmg_impact: f64,
    pub llm_dmg_scaling: f64,
    pub llm_scaled_base_dmg: i64,
    pub bonus_multipliers: Vec<BonusMultiplierImpact>,
    pub total_bonus_damage: i64,
    pub total_dmg: i64,
    pub answer_speed_s: f64,
    pub n_new_words_in_action: u32,
    pub n_overused_words_in_action: u32,
}

impl DamageCalculationResult {
    /// Total damage recomputed from the stored intermediates
    pub fn recompute_total(&self) -> i64 {
        let scaled = (self.base_dmg * self.llm_dmg_scaling).ceil() as i64;
        let bonus: i64 = self
            .bonus_multipliers
            .iter()
            .map(|applied| bonus_impact(scaled, applied.bonus_multiplier.multiplier))
            .sum();
        (scaled + bonus).max(0)
    }

    /// Short breakdown shown after every turn
    pub fn to_summary_string(&self, is_hero_turn: bool) -> String {
        let mut out = String::new();
        if is_hero_turn {
            for boost in self
                .applied_feasibility_boosts
                .iter()
                .chain(&self.applied_potential_damage_boosts)
            {
                let _ = writeln!(
                    out,
                    "{} ({}): {} {:.2} -> {:.2}",
                    boost.item_name,
                    boost.boost_name,
                    boost.kind,
                    boost.base_scaling,
                    boost.boosted_scaling
                );
            }
            for applied in &self.bonus_multipliers {
                let bonus = &applied.bonus_multiplier;
                let _ = writeln!(
                    out,
                    "{} ({}): {} -> {:+}% = {:+} dmg",
                    bonus.item_name,
                    bonus.boost_name,
                    bonus.proc_reason,
                    (bonus.multiplier * 100.0).round(),
                    applied.damage_impact
                );
            }
        }
        let _ = write!(out, "Total damage: {}", self.total_dmg);
        out
    }

    /// Every intermediate value, for debug mode
    pub fn to_debug_string(&self, is_hero_turn: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "attack {} vs defense {}, random factor {:.3}",
            self.attack, self.defense, self.random_factor
        );
        let _ = writeln!(out, "base damage: {:.2}", self.base_dmg);
        let _ = writeln!(
            out,
            "feasibility {:.2} -> {:.2}, potential damage {:.2} -> {:.2}",
            self.feasibility,
            self.boosted_feasibility,
            self.potential_damage,
            self.boosted_potential_damage
        );
        let _ = writeln!(
            out,
            "llm scaling: {} x {:.2} x {:.2} = {:.3}",
            self.llm_dmg_impact,
            self.boosted_feasibility,
            self.boosted_potential_damage,
            self.llm_dmg_scaling
        );
        let _ = writeln!(out, "llm scaled base damage: {}", self.llm_scaled_base_dmg);
        if is_hero_turn {
            let _ = writeln!(
                out,
                "answer speed {:.1}s, new words {}, overused words {}",
                self.answer_speed_s, self.n_new_words_in_action, self.n_overused_words_in_action
            );
        }
        let _ = writeln!(out, "bonus damage: {:+}", self.total_bonus_damage);
        out.push_str(&self.to_summary_string(is_hero_turn));
        out
    }
}

/// Ceil for gains, floor for penalties
fn bonus_impact(llm_scaled_base_dmg: i64, multiplier: f64) -> i64 {
    let raw = llm_scaled_base_dmg as f64 * multiplier;
    if raw < 0.0 {
        raw.floor() as i64
    } else {
        raw.ceil() as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageCalculator {
    config: DamageCalculationConfig,
}

impl DamageCalculator {
    pub fn new(config: DamageCalculationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DamageCalculationConfig {
        &self.config
    }

    fn draw_random_factor(&self, rng: &mut impl Rng) -> f64 {
        let (min, max) = (self.config.random_factor_min, self.config.random_factor_max);
        if min >= max {
            min
        } else {
            rng.gen_range(min..=max)
        }
    }

    /// Resolve one attack; pure apart from the random factor draw
    pub fn calculate_damage(
        &self,
        inputs: &DamageInputs,
        equipped_items: &[ItemRef],
        rng: &mut impl Rng,
    ) -> DamageCalculationResult {
        let random_factor = self.draw_random_factor(rng);
        let ad_diff = f64::from(inputs.attack) - f64::from(inputs.defense);
        let base_dmg = ((self.config.ad_parity_dmg + self.config.ad_diff_scaling * ad_diff)
            * random_factor)
            .max(1.0);

        let mut boosted_feasibility = inputs.feasibility;
        let mut applied_feasibility_boosts = Vec::new();
        for item in equipped_items {
            let boost = item.boost_feasibility(boosted_feasibility);
            if boost.is_applied {
                boosted_feasibility = boost.boosted_scaling;
                applied_feasibility_boosts.push(boost);
            }
        }

        let mut boosted_potential_damage = inputs.potential_damage;
        let mut applied_potential_damage_boosts = Vec::new();
        for item in equipped_items {
            let boost = item.boost_potential_damage(boosted_potential_damage);
            if boost.is_applied {
                boosted_potential_damage = boost.boosted_scaling;
                applied_potential_damage_boosts.push(boost);
            }
        }

        let llm_dmg_scaling =
            self.config.llm_dmg_impact * boosted_feasibility * boosted_potential_damage;
        let llm_scaled_base_dmg = (base_dmg * llm_dmg_scaling).ceil() as i64;

        let bonus_multipliers: Vec<BonusMultiplierImpact> = equipped_items
            .iter()
            .flat_map(|item| {
                item.get_bonus_multipliers(
                    inputs.n_new_words_in_action,
                    inputs.n_overused_words_in_action,
                    inputs.answer_speed_s,
                )
            })
            .filter(|bonus| bonus.is_procced)
            .map(|bonus| BonusMultiplierImpact {
                damage_impact: bonus_impact(llm_scaled_base_dmg, bonus.multiplier),
                bonus_multiplier: bonus,
            })
            .collect();
        let total_bonus_damage: i64 = bonus_multipliers.iter().map(|b| b.damage_impact).sum();
        let total_dmg = (llm_scaled_base_dmg + total_bonus_damage).max(0);

        tracing::debug!(
            base_dmg,
            llm_dmg_scaling,
            llm_scaled_base_dmg,
            total_bonus_damage,
            total_dmg,
            "Damage calculated"
        );

        DamageCalculationResult {
            attack: inputs.attack,
            defense: inputs.defense,
            random_factor,
            base_dmg,
            feasibility: inputs.feasibility,
            potential_damage: inputs.potential_damage,
            boosted_feasibility,
            boosted_potential_damage,
            applied_feasibility_boosts,
            applied_potential_damage_boosts,
            llm_dmg_impact: self.config.llm_dmg_impact,
            llm_dmg_scaling,
            llm_scaled_base_dmg,
            bonus_multipliers,
            total_bonus_damage,
            total_dmg,
            answer_speed_s: inputs.answer_speed_s,
            n_new_words_in_action: inputs.n_new_words_in_action,
            n_overused_words_in_action: inputs.n_overused_words_in_action,
        }
    }
}
