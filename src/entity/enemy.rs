use crate::entity::archetype::EnemyArchetype;
use crate::entity::character::{Character, Combatant};
use crate::entity::stats::Stats;

/// Opponent of a single battle
///
/// Enemies carry no items, so effective stats equal base stats. New enemies
/// start at level 0; enemy scaling brings them to their target level.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub character: Character,
    pub archetype: EnemyArchetype,
}

impl Enemy {
    pub fn new(name: &str, description: &str, base_stats: Stats, archetype: EnemyArchetype) -> Self {
        Self {
            character: Character::new(name, description, 0, base_stats),
            archetype,
        }
    }
}

impl Combatant for Enemy {
    fn character(&self) -> &Character {
        &self.character
    }

    fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    fn current_stats(&self) -> Stats {
        self.character.base_stats
    }
}
