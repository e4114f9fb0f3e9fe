//! The four mutable character stats

use crate::core::types::StatType;
use serde::{Deserialize, Serialize};

/// Attack, defense, focus, and max hp
///
/// Focus bounds how many non-space characters a hero may type per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub attack: i32,
    pub defense: i32,
    pub focus: i32,
    pub max_hp: i32,
}

impl Stats {
    pub fn new(attack: i32, defense: i32, focus: i32, max_hp: i32) -> Self {
        Self {
            attack,
            defense,
            focus,
            max_hp,
        }
    }

    pub fn get(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::Focus => self.focus,
            StatType::MaxHp => self.max_hp,
        }
    }

    pub fn add(&mut self, stat: StatType, amount: i32) {
        match stat {
            StatType::Attack => self.attack += amount,
            StatType::Defense => self.defense += amount,
            StatType::Focus => self.focus += amount,
            StatType::MaxHp => self.max_hp += amount,
        }
    }
}
