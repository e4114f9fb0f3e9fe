//! The player character and its class presets

use crate::core::config::{HeroClassesConfig, HeroConfig};
use crate::core::error::Result;
use crate::core::types::StatType;
use crate::entity::character::{Character, Combatant};
use crate::entity::inventory::Inventory;
use crate::entity::item::{self, ItemRef};
use crate::entity::stats::Stats;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which preset a new hero starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClassKind {
    Attack,
    Defense,
    Focus,
}

impl FromStr for HeroClassKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "attack" | "attacker" => Ok(Self::Attack),
            "defense" | "defender" => Ok(Self::Defense),
            "focus" => Ok(Self::Focus),
            other => Err(format!("unknown hero class: {}", other)),
        }
    }
}

/// Starting stats, flavour text, and item of a hero
#[derive(Debug, Clone)]
pub struct HeroClass {
    pub class_name: String,
    pub description: String,
    pub base_stats: Stats,
    pub starting_item: ItemRef,
}

impl HeroClass {
    pub fn from_config(kind: HeroClassKind, classes: &HeroClassesConfig) -> Self {
        let (class, starting_item) = match kind {
            HeroClassKind::Attack => (&classes.attack, item::baseball_bat()),
            HeroClassKind::Defense => (&classes.defense, item::turtle_shell()),
            HeroClassKind::Focus => (&classes.focus, item::chewed_up_pen()),
        };
        Self {
            class_name: class.class_name.clone(),
            description: class.description.clone(),
            base_stats: class.base_stats,
            starting_item,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub character: Character,
    pub class_name: String,
    pub inventory: Inventory,
    /// Set after an even-numbered win; cleared once the item choice is made
    pub discovered_item: bool,
    /// Set after an odd-numbered win; cleared by `level_up`
    pub should_level_up: bool,
}

impl Hero {
    pub fn new(name: &str, class: &HeroClass, config: &HeroConfig) -> Result<Self> {
        let mut inventory = Inventory::new(config.max_items);
        inventory.add_item(class.starting_item.clone())?;

        let mut hero = Self {
            character: Character::new(name, &class.description, 1, class.base_stats),
            class_name: class.class_name.clone(),
            inventory,
            discovered_item: false,
            should_level_up: false,
        };
        hero.full_heal();
        Ok(hero)
    }

    /// Raise one stat, then heal to the new maximum
    pub fn level_up(&mut self, stat: StatType, amount: i32) {
        self.character.level_up(stat, amount);
        self.should_level_up = false;
        self.full_heal();
    }
}

impl Combatant for Hero {
    fn character(&self) -> &Character {
        &self.character
    }

    fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    fn current_stats(&self) -> Stats {
        let base = self.character.base_stats;
        self.inventory
            .items()
            .iter()
            .fold(base, |stats, item| Stats {
                attack: item.boost_attack(stats.attack),
                defense: item.boost_defense(stats.defense),
                focus: item.boost_focus(stats.focus),
                max_hp: item.boost_max_hp(stats.max_hp),
            })
    }

    fn equipped_items(&self) -> Vec<ItemRef> {
        self.inventory.items().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;

    fn hero(kind: HeroClassKind) -> Hero {
        let config = GameConfig::default();
        let class = HeroClass::from_config(kind, &config.hero.classes);
        Hero::new("Tester", &class, &config.hero).unwrap()
    }

    #[test]
    fn test_effective_stats_include_items() {
        let hero = hero(HeroClassKind::Attack);
        let base = hero.character.base_stats;
        assert_eq!(hero.current_stats().attack, base.attack + 5);
        assert_eq!(hero.current_stats().defense, base.defense);
    }

    #[test]
    fn test_max_hp_item_counts_toward_heal() {
        let mut hero = hero(HeroClassKind::Defense);
        hero.inventory
            .add_item(std::sync::Arc::new(item::StatBoostItem::new(
                "Heart Transplant",
                StatType::MaxHp,
                10,
            )))
            .unwrap();
        hero.full_heal();
        assert_eq!(hero.hp(), hero.character.base_stats.max_hp + 10);
    }

    #[test]
    fn test_level_up_heals_and_clears_flag() {
        let mut hero = hero(HeroClassKind::Focus);
        hero.should_level_up = true;
        hero.inflict_damage(10);
        let focus = hero.character.base_stats.focus;

        hero.level_up(StatType::Focus, 5);
        assert_eq!(hero.character.base_stats.focus, focus + 5);
        assert_eq!(hero.hp(), hero.current_stats().max_hp);
        assert!(!hero.should_level_up);
        assert_eq!(hero.character.level, 2);
    }

    #[test]
    fn test_class_kind_parsing() {
        assert_eq!("Defender".parse::<HeroClassKind>(), Ok(HeroClassKind::Defense));
        assert!("wizard".parse::<HeroClassKind>().is_err());
    }
}
