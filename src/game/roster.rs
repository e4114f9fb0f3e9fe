//! Fixed enemy line-up used when no generator is available

use crate::entity::archetype::EnemyArchetype;
use crate::entity::enemy::Enemy;
use crate::entity::stats::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub archetype: EnemyArchetype,
}

const DEVIL_DOG: RosterEntry = RosterEntry {
    name: "Devil Dog",
    description: "The pet of Lucifer, seems hungry.",
    archetype: EnemyArchetype::Attacker,
};

/// Opponent by battles won; wraps around after the last entry
pub const ROSTER: [RosterEntry; 9] = [
    DEVIL_DOG,
    RosterEntry {
        name: "Hippy",
        description: "Annoyed after the cops took his weed.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Taxi",
        description: "From the streets of New York, known for his aggressive driving style.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Golden Trophy",
        description: "Suddenly became alive after being thrown in the trash.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Tree",
        description: "Grew an appetite for human flesh.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Pile of Goo",
        description: "Seems cute, but very poisonous.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Mushroom Head",
        description: "Somehow became conscious.",
        archetype: EnemyArchetype::Tank,
    },
    RosterEntry {
        name: "Robert",
        description: "Robot that can shoot lasers from his eyes.",
        archetype: EnemyArchetype::Attacker,
    },
    DEVIL_DOG,
];

pub fn roster_entry(battles_won: u32) -> &'static RosterEntry {
    &ROSTER[battles_won as usize % ROSTER.len()]
}

/// Unscaled roster enemy for the next battle
pub fn roster_enemy(battles_won: u32, base_stats: Stats) -> Enemy {
    let entry = roster_entry(battles_won);
    Enemy::new(entry.name, entry.description, base_stats, entry.archetype)
}
