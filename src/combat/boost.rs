//! Records produced when items modify the damage pipeline
//!
//! Items never mutate anything themselves. They return these records and the
//! damage calculator decides which ones take effect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which LLM estimate an item boosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LlmScalingBoostKind {
    Feasibility,
    PotentialDamage,
}

impl fmt::Display for LlmScalingBoostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feasibility => f.write_str("feasibility"),
            Self::PotentialDamage => f.write_str("potential damage"),
        }
    }
}

/// One item's answer when asked to boost feasibility or potential damage
///
/// `is_applied == false` is a no-op and never reaches the applied list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmScalingBoost {
    pub item_name: String,
    pub boost_name: String,
    pub kind: LlmScalingBoostKind,
    pub base_scaling: f64,
    pub boosted_scaling: f64,
    pub is_applied: bool,
}

impl LlmScalingBoost {
    pub fn not_applied(item_name: &str, kind: LlmScalingBoostKind, scaling: f64) -> Self {
        Self {
            item_name: item_name.to_string(),
            boost_name: String::new(),
            kind,
            base_scaling: scaling,
            boosted_scaling: scaling,
            is_applied: false,
        }
    }
}

/// Signal a conditional item effect is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcCondition {
    NewWordsInAction,
    OverusedWordsInAction,
    AnswerSpeedS,
}

impl ProcCondition {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewWordsInAction => "new words in action",
            Self::OverusedWordsInAction => "overused words in action",
            Self::AnswerSpeedS => "answer speed",
        }
    }

    /// Value of this signal among the calculator inputs
    pub fn measure(&self, n_new_words: u32, n_overused_words: u32, answer_speed_s: f64) -> f64 {
        match self {
            Self::NewWordsInAction => f64::from(n_new_words),
            Self::OverusedWordsInAction => f64::from(n_overused_words),
            Self::AnswerSpeedS => answer_speed_s,
        }
    }
}

/// How a measured signal is compared to a rule's threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Below,
    AtLeast,
    AtMost,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Below => value < threshold,
            Self::AtLeast => value >= threshold,
            Self::AtMost => value <= threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Below => "<",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

/// Why a multiplier triggered (or would have)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcReason {
    pub condition: ProcCondition,
    pub comparison: Comparison,
    pub threshold: f64,
    pub value: f64,
}

impl fmt::Display for ProcReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition {
            ProcCondition::AnswerSpeedS => write!(
                f,
                "{} {:.1}s {} {}s",
                self.condition.label(),
                self.value,
                self.comparison.symbol(),
                self.threshold
            ),
            _ => write!(
                f,
                "{} {} {} {}",
                self.condition.label(),
                self.value,
                self.comparison.symbol(),
                self.threshold
            ),
        }
    }
}

/// Conditional damage multiplier offered by an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusMultiplier {
    pub item_name: String,
    pub boost_name: String,
    /// Fraction of the scaled base damage added (negative subtracts)
    pub multiplier: f64,
    pub is_procced: bool,
    pub proc_reason: ProcReason,
}
