//! Item capability interface and the item catalog
//!
//! Every capability has an identity / no-op default; concrete items
//! override the subset they care about. Items are immutable and shared
//! as `Arc<dyn Item>` between the hero, the resting hub, and battle workers.

use crate::combat::boost::{
    BonusMultiplier, Comparison, LlmScalingBoost, LlmScalingBoostKind, ProcCondition, ProcReason,
};
use crate::core::types::StatType;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable item
pub type ItemRef = Arc<dyn Item>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Weapon,
    Boots,
    Helmet,
    Armor,
    Accessory,
}

impl ItemType {
    /// Natural slot for an item that boosts `stat`
    pub fn for_stat(stat: StatType) -> Self {
        match stat {
            StatType::Attack => Self::Weapon,
            StatType::Defense => Self::Armor,
            StatType::Focus | StatType::MaxHp => Self::Accessory,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weapon => "weapon",
            Self::Boots => "boots",
            Self::Helmet => "helmet",
            Self::Armor => "armor",
            Self::Accessory => "accessory",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Secret,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Secret => "secret",
        };
        f.write_str(label)
    }
}

pub trait Item: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn item_type(&self) -> ItemType {
        ItemType::Accessory
    }

    fn rarity(&self) -> Rarity {
        Rarity::Common
    }

    fn boost_attack(&self, attack: i32) -> i32 {
        attack
    }

    fn boost_defense(&self, defense: i32) -> i32 {
        defense
    }

    fn boost_focus(&self, focus: i32) -> i32 {
        focus
    }

    fn boost_max_hp(&self, max_hp: i32) -> i32 {
        max_hp
    }

    fn boost_feasibility(&self, feasibility: f64) -> LlmScalingBoost {
        LlmScalingBoost::not_applied(self.name(), LlmScalingBoostKind::Feasibility, feasibility)
    }

    fn boost_potential_damage(&self, potential_damage: f64) -> LlmScalingBoost {
        LlmScalingBoost::not_applied(
            self.name(),
            LlmScalingBoostKind::PotentialDamage,
            potential_damage,
        )
    }

    fn get_bonus_multipliers(
        &self,
        _n_new_words_in_action: u32,
        _n_overused_words_in_action: u32,
        _answer_speed_s: f64,
    ) -> Vec<BonusMultiplier> {
        Vec::new()
    }
}

/// One-line listing, e.g. `Riot Shield [common armor]: A riot shield.`
pub fn item_summary(item: &dyn Item) -> String {
    format!(
        "{} [{} {}]: {}",
        item.name(),
        item.rarity(),
        item.item_type(),
        item.description()
    )
}

/// Flat bonus to one stat
#[derive(Debug, Clone, PartialEq)]
pub struct StatBoostItem {
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub stat: StatType,
    pub amount: i32,
}

impl StatBoostItem {
    pub fn new(name: &str, stat: StatType, amount: i32) -> Self {
        Self {
            name: name.to_string(),
            description: format!("+{} {}", amount, stat),
            item_type: ItemType::for_stat(stat),
            rarity: Rarity::Common,
            stat,
            amount,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn boost(&self, stat: StatType, value: i32) -> i32 {
        if self.stat == stat {
            value + self.amount
        } else {
            value
        }
    }
}

impl Item for StatBoostItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn item_type(&self) -> ItemType {
        self.item_type
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn boost_attack(&self, attack: i32) -> i32 {
        self.boost(StatType::Attack, attack)
    }

    fn boost_defense(&self, defense: i32) -> i32 {
        self.boost(StatType::Defense, defense)
    }

    fn boost_focus(&self, focus: i32) -> i32 {
        self.boost(StatType::Focus, focus)
    }

    fn boost_max_hp(&self, max_hp: i32) -> i32 {
        self.boost(StatType::MaxHp, max_hp)
    }
}

/// Raises feasibility or potential damage, capped at 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingBoostItem {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub boost_name: String,
    pub kind: LlmScalingBoostKind,
    pub amount: f64,
}

impl ScalingBoostItem {
    pub fn new(name: &str, boost_name: &str, kind: LlmScalingBoostKind, amount: f64) -> Self {
        Self {
            name: name.to_string(),
            description: format!("+{} {}", amount, kind),
            rarity: Rarity::Uncommon,
            boost_name: boost_name.to_string(),
            kind,
            amount,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    fn boost(&self, kind: LlmScalingBoostKind, scaling: f64) -> LlmScalingBoost {
        // Already maxed out estimates are left alone.
        if self.kind != kind || scaling >= 1.0 {
            return LlmScalingBoost::not_applied(&self.name, kind, scaling);
        }
        LlmScalingBoost {
            item_name: self.name.clone(),
            boost_name: self.boost_name.clone(),
            kind,
            base_scaling: scaling,
            boosted_scaling: (scaling + self.amount).min(1.0),
            is_applied: true,
        }
    }
}

impl Item for ScalingBoostItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn boost_feasibility(&self, feasibility: f64) -> LlmScalingBoost {
        self.boost(LlmScalingBoostKind::Feasibility, feasibility)
    }

    fn boost_potential_damage(&self, potential_damage: f64) -> LlmScalingBoost {
        self.boost(LlmScalingBoostKind::PotentialDamage, potential_damage)
    }
}

/// One conditional multiplier of a [`ProcItem`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProcRule {
    pub boost_name: String,
    pub condition: ProcCondition,
    pub comparison: Comparison,
    pub threshold: f64,
    pub multiplier: f64,
}

impl ProcRule {
    pub fn new(
        boost_name: &str,
        condition: ProcCondition,
        comparison: Comparison,
        threshold: f64,
        multiplier: f64,
    ) -> Self {
        Self {
            boost_name: boost_name.to_string(),
            condition,
            comparison,
            threshold,
            multiplier,
        }
    }
}

/// Item whose effects trigger on typing speed or vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct ProcItem {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub rules: Vec<ProcRule>,
}

impl ProcItem {
    pub fn new(name: &str, description: &str, rules: Vec<ProcRule>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rarity: Rarity::Uncommon,
            rules,
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }
}

impl Item for ProcItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn get_bonus_multipliers(
        &self,
        n_new_words_in_action: u32,
        n_overused_words_in_action: u32,
        answer_speed_s: f64,
    ) -> Vec<BonusMultiplier> {
        self.rules
            .iter()
            .map(|rule| {
                let value = rule.condition.measure(
                    n_new_words_in_action,
                    n_overused_words_in_action,
                    answer_speed_s,
                );
                BonusMultiplier {
                    item_name: self.name.clone(),
                    boost_name: rule.boost_name.clone(),
                    multiplier: rule.multiplier,
                    is_procced: rule.comparison.holds(value, rule.threshold),
                    proc_reason: ProcReason {
                        condition: rule.condition,
                        comparison: rule.comparison,
                        threshold: rule.threshold,
                        value,
                    },
                }
            })
            .collect()
    }
}

fn stat_item(name: &str, stat: StatType, amount: i32, description: &str) -> ItemRef {
    Arc::new(StatBoostItem::new(name, stat, amount).with_description(description))
}

pub fn baseball_bat() -> ItemRef {
    stat_item(
        "Baseball Bat",
        StatType::Attack,
        5,
        "A simple baseball bat. Increases attack by 5.",
    )
}

pub fn turtle_shell() -> ItemRef {
    stat_item(
        "Turtle Shell",
        StatType::Defense,
        5,
        "A turtle shell. Increases defense by 5.",
    )
}

pub fn chewed_up_pen() -> ItemRef {
    stat_item(
        "Chewed Up Pen",
        StatType::Focus,
        5,
        "A chewed up pen. Increases focus by 5.",
    )
}

/// Items that can be discovered between battles
pub fn all_items() -> Vec<ItemRef> {
    vec![
        stat_item(
            "Laser Pistol",
            StatType::Attack,
            10,
            "A laser pistol. Increases attack by 10.",
        ),
        stat_item(
            "Riot Shield",
            StatType::Defense,
            10,
            "A riot shield. Increases defense by 10.",
        ),
        stat_item(
            "Adderall Box",
            StatType::Focus,
            10,
            "Box of pills that enhances mental clarity. Increases focus by 10.",
        ),
        stat_item(
            "Heart Transplant",
            StatType::MaxHp,
            10,
            "A heart transplant. Increases max hp by 10.",
        ),
        Arc::new(ProcItem::new(
            "Adrenaline Pump",
            "A pump that increases adrenaline. Do 30% more damage when you typed your answer in faster than 10 seconds.",
            vec![ProcRule::new(
                "Adrenaline Rush",
                ProcCondition::AnswerSpeedS,
                Comparison::Below,
                10.0,
                0.3,
            )],
        )),
        Arc::new(ProcItem::new(
            "Thesaurus",
            "A dog-eared thesaurus. Do 20% more damage when your action uses at least 3 new words.",
            vec![ProcRule::new(
                "Eloquence",
                ProcCondition::NewWordsInAction,
                Comparison::AtLeast,
                3.0,
                0.2,
            )],
        )),
        Arc::new(ProcItem::new(
            "Broken Record",
            "A scratched vinyl record. Do 15% more damage with no overused words, but 25% less with 2 or more.",
            vec![
                ProcRule::new(
                    "Fresh Take",
                    ProcCondition::OverusedWordsInAction,
                    Comparison::AtMost,
                    0.0,
                    0.15,
                ),
                ProcRule::new(
                    "Skipping",
                    ProcCondition::OverusedWordsInAction,
                    Comparison::AtLeast,
                    2.0,
                    -0.25,
                ),
            ],
        )
        .with_rarity(Rarity::Rare)),
        Arc::new(
            ScalingBoostItem::new("Lucky Rabbit Foot", "Luck", LlmScalingBoostKind::Feasibility, 0.1)
                .with_description("A lucky rabbit foot. Increases feasibility by 0.1."),
        ),
        Arc::new(
            ScalingBoostItem::new("Megaphone", "Amplify", LlmScalingBoostKind::PotentialDamage, 0.1)
                .with_description("A megaphone. Increases potential damage by 0.1.")
                .with_rarity(Rarity::Rare),
        ),
    ]
}
