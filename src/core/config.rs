//! Game configuration with documented tuning values
//!
//! Every section has defaults, so a TOML file only needs to list the values
//! it overrides. Components receive their own section by constructor
//! injection; there is no global config.

use crate::core::error::{Result, RpgError};
use crate::entity::stats::Stats;
use crate::llm::prompt;
use serde::Deserialize;
use std::path::Path;

/// Coefficients of the damage pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DamageCalculationConfig {
    /// Extra (or reduced) damage per point of attack above (or below) defense
    pub ad_diff_scaling: f64,
    /// Damage dealt when attack equals defense
    pub ad_parity_dmg: f64,
    pub random_factor_max: f64,
    pub random_factor_min: f64,
    /// Global weight of the judge's feasibility × potential damage product
    pub llm_dmg_impact: f64,
}

impl Default for DamageCalculationConfig {
    fn default() -> Self {
        Self {
            ad_diff_scaling: 0.5,
            ad_parity_dmg: 5.0,
            random_factor_max: 1.15,
            random_factor_min: 0.85,
            llm_dmg_impact: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreativityConfig {
    /// Cumulative uses after which a word counts as overused
    pub word_overuse_threshold: u32,
}

impl Default for CreativityConfig {
    fn default() -> Self {
        Self {
            word_overuse_threshold: 3,
        }
    }
}

/// Blend of linear and exponential enemy level growth
///
/// The exponential weight is always `1 - linear_scaling_factor`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelScaling {
    pub exp_growth_rate: f64,
    pub linear_growth_rate: f64,
    pub linear_scaling_factor: f64,
}

impl LevelScaling {
    pub fn exponential_scaling_factor(&self) -> f64 {
        1.0 - self.linear_scaling_factor
    }
}

impl Default for LevelScaling {
    fn default() -> Self {
        Self {
            exp_growth_rate: 1.5,
            linear_growth_rate: 2.0,
            linear_scaling_factor: 0.7,
        }
    }
}

/// Relative weights for which stat an enemy level-up raises
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelingAttributeProbs {
    pub attack: f64,
    pub defense: f64,
    pub max_hp: f64,
}

impl LevelingAttributeProbs {
    pub fn new(attack: f64, defense: f64, max_hp: f64) -> Self {
        Self {
            attack,
            defense,
            max_hp,
        }
    }

    fn validate(&self, archetype: &str) -> Result<()> {
        let weights = [self.attack, self.defense, self.max_hp];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RpgError::Config(format!(
                "leveling probabilities for {} must be finite and non-negative",
                archetype
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(RpgError::Config(format!(
                "leveling probabilities for {} must not all be zero",
                archetype
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyArchetypesLevelingAttributeProbs {
    pub attacker: LevelingAttributeProbs,
    pub defender: LevelingAttributeProbs,
    pub tank: LevelingAttributeProbs,
}

impl Default for EnemyArchetypesLevelingAttributeProbs {
    fn default() -> Self {
        Self {
            attacker: LevelingAttributeProbs::new(0.6, 0.2, 0.2),
            defender: LevelingAttributeProbs::new(0.2, 0.6, 0.2),
            tank: LevelingAttributeProbs::new(0.2, 0.2, 0.6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeroClassConfig {
    pub class_name: String,
    pub description: String,
    pub base_stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroClassesConfig {
    pub attack: HeroClassConfig,
    pub defense: HeroClassConfig,
    pub focus: HeroClassConfig,
}

impl Default for HeroClassesConfig {
    fn default() -> Self {
        Self {
            attack: HeroClassConfig {
                class_name: "Brawler".into(),
                description: "Hits first, asks questions later.".into(),
                base_stats: Stats::new(15, 8, 25, 40),
            },
            defense: HeroClassConfig {
                class_name: "Guardian".into(),
                description: "Sturdy and patient, outlasts any opponent.".into(),
                base_stats: Stats::new(10, 13, 25, 45),
            },
            focus: HeroClassConfig {
                class_name: "Wordsmith".into(),
                description: "Has a way with words and a plan for everything.".into(),
                base_stats: Stats::new(10, 8, 35, 40),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub max_items: usize,
    pub stats_level_up_amount: i32,
    pub classes: HeroClassesConfig,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            max_items: 3,
            stats_level_up_amount: 5,
            classes: HeroClassesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub base_stats: Stats,
    pub stats_level_up_amount: i32,
    pub level_scaling: LevelScaling,
    pub leveling_stats_probs: EnemyArchetypesLevelingAttributeProbs,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_stats: Stats::new(8, 8, 0, 30),
            stats_level_up_amount: 3,
            level_scaling: LevelScaling::default(),
            leveling_stats_probs: EnemyArchetypesLevelingAttributeProbs::default(),
        }
    }
}

/// Timing and neutral inputs of the battle loop (seconds)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub hero_max_wait_s: f64,
    pub enemy_max_wait_s: f64,
    pub generation_max_wait_s: f64,
    /// Thinking screens stay up at least this long, even for instant answers
    pub minimum_display_s: f64,
    /// Answer speed recorded for an empty ("did nothing") submission
    pub idle_answer_speed_s: f64,
    /// Answer speed fed to the damage calculator for enemy actions
    pub enemy_answer_speed_s: f64,
    /// Auto-submit whatever was typed once this much time has passed
    pub turn_input_timeout_s: Option<f64>,
    /// Number of past events summarised for the judge and narrator
    pub battle_log_context_events: usize,
    /// Number of past events shown on the turn screen
    pub displayed_events: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hero_max_wait_s: 60.0,
            enemy_max_wait_s: 20.0,
            generation_max_wait_s: 30.0,
            minimum_display_s: 0.25,
            idle_answer_speed_s: 100.0,
            enemy_answer_speed_s: 1000.0,
            turn_input_timeout_s: None,
            battle_log_context_events: 5,
            displayed_events: 2,
        }
    }
}

/// Prompt templates; `{placeholder}` fields are filled per call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub action_judge: String,
    pub action_narration: String,
    pub enemy_next_action: String,
    pub enemy_generation: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            action_judge: prompt::DEFAULT_ACTION_JUDGE.into(),
            action_narration: prompt::DEFAULT_ACTION_NARRATION.into(),
            enemy_next_action: prompt::DEFAULT_ENEMY_NEXT_ACTION.into(),
            enemy_generation: prompt::DEFAULT_ENEMY_GENERATION.into(),
        }
    }
}

/// Wire format spoken by the model endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    Anthropic,
    /// OpenAI, DeepSeek, Ollama, and other chat-completions endpoints
    OpenAiCompatible,
}

impl LlmProvider {
    pub fn default_url(self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
            Self::OpenAiCompatible => "https://api.openai.com/v1/chat/completions",
        }
    }
}

/// Model endpoint; the key itself is only ever read from the environment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Falls back to the provider's public endpoint
    pub api_url: Option<String>,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub request_timeout_s: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            api_url: None,
            model: "claude-3-haiku-20240307".into(),
            api_key_env: "LLM_API_KEY".into(),
            max_tokens: 1024,
            temperature: None,
            request_timeout_s: 45.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Shows full damage audit trails and logs prompts
    pub debug_mode: bool,
    pub damage_calculator: DamageCalculationConfig,
    pub creativity_tracker: CreativityConfig,
    pub hero: HeroConfig,
    pub enemy: EnemyConfig,
    pub battle: BattleConfig,
    pub prompts: PromptsConfig,
    pub llm: LlmConfig,
}

impl GameConfig {
    /// Load configuration from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let dmg = &self.damage_calculator;
        if dmg.random_factor_min > dmg.random_factor_max {
            return Err(RpgError::Config(format!(
                "random_factor_min ({}) must be <= random_factor_max ({})",
                dmg.random_factor_min, dmg.random_factor_max
            )));
        }
        if !dmg.random_factor_min.is_finite() || !dmg.random_factor_max.is_finite() {
            return Err(RpgError::Config("random factor bounds must be finite".into()));
        }

        if self.creativity_tracker.word_overuse_threshold == 0 {
            return Err(RpgError::Config(
                "word_overuse_threshold must be at least 1".into(),
            ));
        }

        let scaling = &self.enemy.level_scaling;
        if !(0.0..=1.0).contains(&scaling.linear_scaling_factor) {
            return Err(RpgError::Config(format!(
                "linear_scaling_factor ({}) must be within [0, 1]",
                scaling.linear_scaling_factor
            )));
        }

        let probs = &self.enemy.leveling_stats_probs;
        probs.attacker.validate("attacker")?;
        probs.defender.validate("defender")?;
        probs.tank.validate("tank")?;

        if self.hero.max_items == 0 {
            return Err(RpgError::Config("hero.max_items must be at least 1".into()));
        }

        let battle = &self.battle;
        if battle.minimum_display_s < 0.0
            || battle.hero_max_wait_s <= 0.0
            || battle.enemy_max_wait_s <= 0.0
            || battle.generation_max_wait_s <= 0.0
        {
            return Err(RpgError::Config(
                "battle wait times must be positive".into(),
            ));
        }

        let llm = &self.llm;
        if llm.model.trim().is_empty() || llm.max_tokens == 0 || llm.request_timeout_s <= 0.0 {
            return Err(RpgError::Config(
                "llm needs a model, max_tokens >= 1 and a positive request timeout".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::parse_toml(
            r#"
            debug_mode = true

            [damage_calculator]
            ad_parity_dmg = 1.0
            random_factor_min = 1.0
            random_factor_max = 1.0

            [enemy.leveling_stats_probs.tank]
            attack = 0.0
            defense = 0.0
            max_hp = 1.0
            "#,
        )
        .unwrap();

        assert!(config.debug_mode);
        assert_eq!(config.damage_calculator.ad_parity_dmg, 1.0);
        assert_eq!(config.damage_calculator.ad_diff_scaling, 0.5);
        assert_eq!(config.enemy.leveling_stats_probs.tank.max_hp, 1.0);
        assert_eq!(config.hero.max_items, 3);
    }

    #[test]
    fn test_inverted_random_bounds_rejected() {
        let result = GameConfig::parse_toml(
            r#"
            [damage_calculator]
            random_factor_min = 1.2
            random_factor_max = 0.8
            "#,
        );
        assert!(matches!(result, Err(RpgError::Config(_))));
    }

    #[test]
    fn test_zero_probability_vector_rejected() {
        let mut config = GameConfig::default();
        config.enemy.leveling_stats_probs.attacker = LevelingAttributeProbs::new(0.0, 0.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_exponential_factor_complements_linear() {
        let scaling = LevelScaling {
            exp_growth_rate: 1.0,
            linear_growth_rate: 1.0,
            linear_scaling_factor: 0.25,
        };
        assert!((scaling.exponential_scaling_factor() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_llm_section() {
        let config = GameConfig::parse_toml(
            r#"
            [llm]
            provider = "open_ai_compatible"
            api_url = "http://localhost:11434/v1/chat/completions"
            model = "llama3"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.api_key_env, "LLM_API_KEY");

        let result = GameConfig::parse_toml("[llm]\nmax_tokens = 0\n");
        assert!(matches!(result, Err(RpgError::Config(_))));
    }
}
