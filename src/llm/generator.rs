//! LLM-backed enemy action and enemy generators

use crate::battle::ports::{EnemyActionGenerator, EnemyGenerator, GeneratedEnemy};
use crate::core::error::{Result, RpgError};
use crate::entity::archetype::EnemyArchetype;
use crate::entity::character::CombatantSnapshot;
use crate::llm::client::LlmClient;
use crate::llm::parser::parse_generated_enemy;
use crate::llm::prompt::{fill, GAME_MASTER_SYSTEM};
use crate::llm::retry::{with_retries, MAX_ATTEMPTS};
use async_trait::async_trait;
use std::sync::Arc;

pub struct LlmEnemyActionGenerator {
    client: Arc<LlmClient>,
    template: String,
}

impl LlmEnemyActionGenerator {
    pub fn new(client: Arc<LlmClient>, template: String) -> Self {
        Self { client, template }
    }
}

#[async_trait]
impl EnemyActionGenerator for LlmEnemyActionGenerator {
    async fn generate_next_action(
        &self,
        enemy: &CombatantSnapshot,
        hero: &CombatantSnapshot,
        battle_history: &str,
    ) -> Result<String> {
        let enemy_context = enemy.battle_context();
        let hero_context = hero.battle_context();
        let prompt = fill(
            &self.template,
            &[
                ("enemy_name", enemy.name.as_str()),
                ("enemy", enemy_context.as_str()),
                ("hero", hero_context.as_str()),
                ("battle_history", battle_history),
            ],
        );
        let response = self.client.complete(GAME_MASTER_SYSTEM, &prompt).await?;
        let action = response.trim();
        if action.is_empty() {
            return Err(RpgError::LlmError("empty enemy action".into()));
        }
        Ok(action.to_string())
    }
}

pub struct LlmEnemyGenerator {
    client: Arc<LlmClient>,
    template: String,
}

impl LlmEnemyGenerator {
    pub fn new(client: Arc<LlmClient>, template: String) -> Self {
        Self { client, template }
    }
}

#[async_trait]
impl EnemyGenerator for LlmEnemyGenerator {
    async fn generate_enemy(&self, archetype: EnemyArchetype) -> Result<GeneratedEnemy> {
        let archetype = archetype.to_string();
        let prompt = fill(&self.template, &[("archetype", archetype.as_str())]);
        let prompt = &prompt;
        with_retries("enemy generator", MAX_ATTEMPTS, || async move {
            let response = self.client.complete(GAME_MASTER_SYSTEM, prompt).await?;
            parse_generated_enemy(&response)
        })
        .await
    }
}
