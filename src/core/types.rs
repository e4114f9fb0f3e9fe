//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four mutable character stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Attack,
    Defense,
    Focus,
    MaxHp,
}

impl StatType {
    /// All stat types in display order
    pub const ALL: [StatType; 4] = [
        StatType::Attack,
        StatType::Defense,
        StatType::Focus,
        StatType::MaxHp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::Focus => "focus",
            Self::MaxHp => "max hp",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the battle an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Hero,
    Enemy,
}

impl Side {
    /// The side that receives damage when this side acts
    pub fn opponent(&self) -> Side {
        match self {
            Self::Hero => Self::Enemy,
            Self::Enemy => Self::Hero,
        }
    }
}
