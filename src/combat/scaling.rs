//! Enemy difficulty growth tied to battles won

use crate::core::config::{EnemyConfig, LevelScaling};
use crate::core::error::{Result, RpgError};
use crate::core::types::StatType;
use crate::entity::enemy::Enemy;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Stats an enemy can level; focus is hero-only
const ENEMY_LEVELING_STATS: [StatType; 3] = [StatType::Attack, StatType::Defense, StatType::MaxHp];

/// Target level for the battle after `battles_won` victories
///
/// Blends linear and exponential growth; the `+ 1` lifts the first battle
/// above the minimum.
pub fn scaled_level(battles_won: u32, scaling: &LevelScaling) -> u32 {
    let n = f64::from(battles_won) + 1.0;
    let linear = scaling.linear_growth_rate * n * scaling.linear_scaling_factor;
    let exponential = scaling.exp_growth_rate.powf(n) * scaling.exponential_scaling_factor();
    ((linear + exponential).floor() as u32).max(1)
}

/// Level `enemy` up to the target level for `battles_won`
///
/// Each step picks one stat with the archetype's weights and raises it by
/// the configured per-level amount. Unusable weights leave the enemy
/// untouched and return `RpgError::Config`.
pub fn scale_enemy(
    enemy: &mut Enemy,
    battles_won: u32,
    config: &EnemyConfig,
    rng: &mut impl Rng,
) -> Result<()> {
    let target = scaled_level(battles_won, &config.level_scaling);
    let probs = enemy
        .archetype
        .leveling_probs(&config.leveling_stats_probs);
    let weights = [probs.attack, probs.defense, probs.max_hp];

    let distribution = WeightedIndex::new(weights).map_err(|e| {
        RpgError::Config(format!(
            "{} leveling weights {:?}: {}",
            enemy.archetype, weights, e
        ))
    })?;
    for _ in 0..target {
        let stat = ENEMY_LEVELING_STATS[distribution.sample(rng)];
        enemy.character.level_up(stat, config.stats_level_up_amount);
    }

    tracing::debug!(
        name = %enemy.character.name,
        battles_won,
        level = enemy.character.level,
        "Enemy scaled"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaling(linear_rate: f64, exp_rate: f64, linear_factor: f64) -> LevelScaling {
        LevelScaling {
            exp_growth_rate: exp_rate,
            linear_growth_rate: linear_rate,
            linear_scaling_factor: linear_factor,
        }
    }

    #[test]
    fn test_pure_linear() {
        assert_eq!(scaled_level(2, &scaling(1.0, 1.0, 1.0)), 3);
    }

    #[test]
    fn test_blend() {
        // 1 * 3 * 0.5 + 2^3 * 0.5 = 5.5
        assert_eq!(scaled_level(2, &scaling(1.0, 2.0, 0.5)), 5);
    }

    #[test]
    fn test_never_below_one() {
        assert_eq!(scaled_level(0, &scaling(0.0, 0.0, 1.0)), 1);
    }

    #[test]
    fn test_unusable_weights_are_an_error() {
        use crate::core::config::LevelingAttributeProbs;
        use crate::entity::archetype::EnemyArchetype;
        use crate::entity::stats::Stats;
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut config = EnemyConfig::default();
        config.leveling_stats_probs.tank = LevelingAttributeProbs::new(0.0, 0.0, 0.0);
        let mut enemy = Enemy::new("Tree", "A tree.", Stats::new(8, 8, 0, 30), EnemyArchetype::Tank);

        let result = scale_enemy(&mut enemy, 3, &config, &mut ChaCha8Rng::seed_from_u64(9));
        assert!(matches!(result, Err(RpgError::Config(msg)) if msg.contains("tank")));
        assert_eq!(enemy.character.level, 0);
        assert_eq!(enemy.character.base_stats, Stats::new(8, 8, 0, 30));
    }
}
