//! Parse structured answers out of LLM replies

use crate::battle::ports::{ActionJudgment, GeneratedEnemy};
use crate::core::error::{Result, RpgError};
use serde::Deserialize;

const MAX_JUDGE_SCORE: f64 = 10.0;
const ENEMY_NAME_CHARS: std::ops::RangeInclusive<usize> = 2..=40;
const ENEMY_DESCRIPTION_CHARS: std::ops::RangeInclusive<usize> = 10..=200;

#[derive(Debug, Deserialize)]
struct RawJudgment {
    feasibility: f64,
    potential_damage: f64,
}

#[derive(Debug, Deserialize)]
struct RawEnemy {
    name: String,
    description: String,
}

/// Extract JSON object from LLM response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| RpgError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| RpgError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(RpgError::LlmError("Malformed JSON in response".into()));
    }
    Ok(&response[start..=end])
}

/// Read 0-10 scores and normalise them to [0, 1]
pub fn parse_judgment(response: &str) -> Result<ActionJudgment> {
    let raw: RawJudgment = serde_json::from_str(extract_json(response)?)?;
    for (field, value) in [
        ("feasibility", raw.feasibility),
        ("potential_damage", raw.potential_damage),
    ] {
        if !(0.0..=MAX_JUDGE_SCORE).contains(&value) {
            return Err(RpgError::LlmError(format!(
                "{} out of range: {}",
                field, value
            )));
        }
    }
    Ok(ActionJudgment::new(
        raw.feasibility / MAX_JUDGE_SCORE,
        raw.potential_damage / MAX_JUDGE_SCORE,
    ))
}

pub fn parse_generated_enemy(response: &str) -> Result<GeneratedEnemy> {
    let raw: RawEnemy = serde_json::from_str(extract_json(response)?)?;
    let name = raw.name.trim().to_string();
    let description = raw.description.trim().to_string();
    if !ENEMY_NAME_CHARS.contains(&name.chars().count()) {
        return Err(RpgError::LlmError(format!(
            "enemy name must be 2 to 40 characters: {:?}",
            name
        )));
    }
    if !ENEMY_DESCRIPTION_CHARS.contains(&description.chars().count()) {
        return Err(RpgError::LlmError(format!(
            "enemy description must be 10 to 200 characters: {:?}",
            description
        )));
    }
    Ok(GeneratedEnemy { name, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = "Sure!\n{\"feasibility\": 7, \"potential_damage\": 3}\nGood luck.";
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_extract_json_no_json() {
        assert!(extract_json("I refuse").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn test_judgment_is_normalised() {
        let judgment = parse_judgment(r#"{"feasibility": 7, "potential_damage": 2.5}"#).unwrap();
        assert!((judgment.feasibility - 0.7).abs() < 1e-9);
        assert!((judgment.potential_damage - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_judgment_out_of_range() {
        assert!(parse_judgment(r#"{"feasibility": 11, "potential_damage": 2}"#).is_err());
        assert!(parse_judgment(r#"{"feasibility": 5}"#).is_err());
    }

    #[test]
    fn test_generated_enemy_validation() {
        let enemy = parse_generated_enemy(
            r#"{"name": "Angry Toaster", "description": "A toaster that has seen too much."}"#,
        )
        .unwrap();
        assert_eq!(enemy.name, "Angry Toaster");

        assert!(parse_generated_enemy(r#"{"name": "X", "description": "Long enough text."}"#).is_err());
        assert!(parse_generated_enemy(r#"{"name": "Toaster", "description": "short"}"#).is_err());
    }
}
