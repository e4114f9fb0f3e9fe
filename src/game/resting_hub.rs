//! Between-battle rewards: level-ups and item discovery

use crate::core::error::{Result, RpgError};
use crate::core::types::StatType;
use crate::entity::character::Combatant;
use crate::entity::hero::Hero;
use crate::entity::item::{all_items, item_summary, ItemRef};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Write;

/// Items offered per discovery
pub const ITEM_CHOICES: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct RestingHub {
    item_choices: Vec<ItemRef>,
}

/// Up to `n` random catalog items the hero does not already own
pub fn sample_unowned_items(hero: &Hero, n: usize, rng: &mut impl Rng) -> Vec<ItemRef> {
    let unowned: Vec<ItemRef> = all_items()
        .into_iter()
        .filter(|item| !hero.inventory.contains_named(item.name()))
        .collect();
    unowned.choose_multiple(rng, n).cloned().collect()
}

impl RestingHub {
    pub fn new(hero: &Hero, rng: &mut impl Rng) -> Self {
        let item_choices = if hero.discovered_item {
            sample_unowned_items(hero, ITEM_CHOICES, rng)
        } else {
            Vec::new()
        };
        Self { item_choices }
    }

    pub fn item_choices(&self) -> &[ItemRef] {
        &self.item_choices
    }

    /// The hero may leave once any pending level-up is spent
    pub fn can_continue(&self, hero: &Hero) -> bool {
        !hero.should_level_up
    }

    pub fn level_up(&mut self, hero: &mut Hero, stat: StatType, amount: i32) -> Result<()> {
        if !hero.should_level_up {
            return Err(RpgError::InvalidAction("no level-up available".into()));
        }
        hero.level_up(stat, amount);
        tracing::info!(%stat, level = hero.character.level, "Hero leveled up");
        Ok(())
    }

    fn choice(&self, index: usize) -> Result<ItemRef> {
        self.item_choices
            .get(index)
            .cloned()
            .ok_or_else(|| RpgError::InvalidAction(format!("no item choice {}", index + 1)))
    }

    /// Equip a discovered item into a free slot
    pub fn pick_up(&mut self, hero: &mut Hero, index: usize) -> Result<()> {
        let item = self.choice(index)?;
        hero.inventory.add_item(item.clone())?;
        tracing::info!(item = item.name(), "Item picked up");
        self.finish_discovery(hero);
        Ok(())
    }

    /// Swap a discovered item for an equipped one
    pub fn replace(
        &mut self,
        hero: &mut Hero,
        index: usize,
        inventory_index: usize,
    ) -> Result<ItemRef> {
        let item = self.choice(index)?;
        let dropped = hero.inventory.replace(inventory_index, item.clone())?;
        tracing::info!(item = item.name(), dropped = dropped.name(), "Item replaced");
        // A dropped max hp item may leave hp above the new maximum.
        let max_hp = hero.current_stats().max_hp;
        if hero.character.hp > max_hp {
            hero.character.hp = max_hp;
        }
        self.finish_discovery(hero);
        Ok(dropped)
    }

    pub fn skip_item(&mut self, hero: &mut Hero) {
        self.finish_discovery(hero);
    }

    fn finish_discovery(&mut self, hero: &mut Hero) {
        self.item_choices.clear();
        hero.discovered_item = false;
    }

    pub fn render(&self, hero: &Hero, battles_won: u32) -> String {
        let stats = hero.current_stats();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Resting. Battles won: {}. {} ({}) level {}",
            battles_won, hero.character.name, hero.class_name, hero.character.level
        );
        let _ = writeln!(
            out,
            "attack {} | defense {} | focus {} | hp {}/{}",
            stats.attack,
            stats.defense,
            stats.focus,
            hero.hp(),
            stats.max_hp
        );
        for (i, item) in hero.inventory.items().iter().enumerate() {
            let _ = writeln!(out, "  slot {}: {}", i + 1, item_summary(item.as_ref()));
        }
        if hero.should_level_up {
            out.push_str("You can level up: type `level <attack|defense|focus|hp>`.\n");
        }
        if !self.item_choices.is_empty() {
            out.push_str("You found items:\n");
            for (i, item) in self.item_choices.iter().enumerate() {
                let _ = writeln!(out, "  {}: {}", i + 1, item_summary(item.as_ref()));
            }
            out.push_str("Type `take <n>`, `swap <n> <slot>`, or `skip`.\n");
        }
        out.push_str("Type `fight` for the next battle.");
        out
    }
}
