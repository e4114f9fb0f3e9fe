//! Shared character state and the combatant interface

use crate::core::types::StatType;
use crate::entity::item::ItemRef;
use crate::entity::stats::Stats;

/// State common to heroes and enemies
///
/// Invariant: `0 <= hp <= effective max hp`.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub base_stats: Stats,
    pub hp: i32,
}

impl Character {
    /// New character at full health
    pub fn new(name: &str, description: &str, level: u32, base_stats: Stats) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            level,
            base_stats,
            hp: base_stats.max_hp,
        }
    }

    /// Raise one base stat and the level counter
    ///
    /// A max hp level-up also raises current hp by the same amount.
    pub fn level_up(&mut self, stat: StatType, amount: i32) {
        self.base_stats.add(stat, amount);
        self.level += 1;
        if stat == StatType::MaxHp {
            self.hp += amount;
        }
    }
}

/// Anything that can take part in a battle
pub trait Combatant {
    fn character(&self) -> &Character;

    fn character_mut(&mut self) -> &mut Character;

    /// Effective stats, recomputed on every call
    fn current_stats(&self) -> Stats;

    /// Items consulted by the damage calculator when this combatant attacks
    fn equipped_items(&self) -> Vec<ItemRef> {
        Vec::new()
    }

    fn name(&self) -> &str {
        &self.character().name
    }

    fn hp(&self) -> i32 {
        self.character().hp
    }

    fn inflict_damage(&mut self, damage: i64) {
        let character = self.character_mut();
        let remaining = i64::from(character.hp) - damage.max(0);
        character.hp = remaining.max(0) as i32;
    }

    fn is_dead(&self) -> bool {
        self.character().hp <= 0
    }

    fn full_heal(&mut self) {
        let max_hp = self.current_stats().max_hp;
        self.character_mut().hp = max_hp;
    }

    /// Owned copy handed to background workers
    fn snapshot(&self) -> CombatantSnapshot {
        let character = self.character();
        CombatantSnapshot {
            name: character.name.clone(),
            description: character.description.clone(),
            level: character.level,
            stats: self.current_stats(),
            hp: character.hp,
            items: self.equipped_items(),
        }
    }
}

/// Frozen view of a combatant at the start of a thinking phase
#[derive(Debug, Clone)]
pub struct CombatantSnapshot {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub stats: Stats,
    pub hp: i32,
    pub items: Vec<ItemRef>,
}

impl CombatantSnapshot {
    /// One-paragraph description used in prompts
    pub fn battle_context(&self) -> String {
        let mut context = format!(
            "{} (level {}): {} Attack {}, defense {}, hp {}/{}.",
            self.name,
            self.level,
            self.description,
            self.stats.attack,
            self.stats.defense,
            self.hp,
            self.stats.max_hp
        );
        if !self.items.is_empty() {
            let names: Vec<&str> = self.items.iter().map(|item| item.name()).collect();
            context.push_str(&format!(" Carries: {}.", names.join(", ")));
        }
        context
    }
}
