//! Prompt templates
//!
//! Templates use `{name}` placeholders and can be overridden in the
//! `[prompts]` config section.

pub const GAME_MASTER_SYSTEM: &str =
    "You are the game master of a light-hearted turn-based fighting game. \
     Follow the output format exactly.";

pub const DEFAULT_ACTION_JUDGE: &str = r#"Judge the proposed action of {attacker_name}.

ATTACKER:
{attacker}

DEFENDER:
{defender}

RECENT TURNS:
{battle_history}

PROPOSED ACTION:
{proposed_action}

Rate the action on two scales from 0 to 10:
- feasibility: how likely the attacker can actually pull this off right now
- potential_damage: how much harm it would do to the defender if it works

Reply with JSON only:
{"feasibility": <0-10>, "potential_damage": <0-10>}"#;

pub const DEFAULT_ACTION_NARRATION: &str = r#"Narrate the outcome of an action in one or two vivid sentences.

ATTACKER:
{attacker}

DEFENDER:
{defender}

RECENT TURNS:
{battle_history}

PROPOSED ACTION:
{proposed_action}

The action had feasibility {feasibility} and potential damage {potential_damage} (0 to 1) and dealt {total_dmg} damage.
Describe what happened without mentioning numbers."#;

pub const DEFAULT_ENEMY_NEXT_ACTION: &str = r#"You control {enemy_name} in a fight.

YOU:
{enemy}

OPPONENT:
{hero}

RECENT TURNS:
{battle_history}

Describe your next action in one short sentence, in the first person. Reply with the action only."#;

pub const DEFAULT_ENEMY_GENERATION: &str = r#"Invent a new enemy for a quirky modern-day fantasy fighting game.
Its fighting style is: {archetype}.

Reply with JSON only:
{"name": "<2 to 40 characters>", "description": "<10 to 200 characters>"}"#;

/// Replace every `{key}` in `template` with its value
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}
