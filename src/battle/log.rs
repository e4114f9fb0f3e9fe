//! Append-only record of resolved turns

use crate::combat::damage::DamageCalculationResult;

/// One resolved half-turn
#[derive(Debug, Clone, PartialEq)]
pub struct BattleEvent {
    pub is_hero_turn: bool,
    pub character_name: String,
    pub proposed_action: String,
    pub effect_description: String,
    pub damage_calculation_result: DamageCalculationResult,
}

impl BattleEvent {
    fn to_display_string(&self, debug: bool) -> String {
        let breakdown = if debug {
            self.damage_calculation_result
                .to_debug_string(self.is_hero_turn)
        } else {
            self.damage_calculation_result
                .to_summary_string(self.is_hero_turn)
        };
        format!(
            "{}: {}\n{}\n{}",
            self.character_name, self.proposed_action, self.effect_description, breakdown
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The last `n` events, oldest first
    pub fn recent_events(&self, n: usize) -> &[BattleEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    /// Context lines for the judge and narrator
    pub fn to_string_for_battle_ai(&self, n: usize) -> String {
        self.recent_events(n)
            .iter()
            .map(|event| format!("{} turn: {}", event.character_name, event.effect_description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Player-facing recap of the last `n` events
    pub fn string_of_last_events(&self, n: usize, debug: bool) -> String {
        self.recent_events(n)
            .iter()
            .map(|event| event.to_display_string(debug))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
