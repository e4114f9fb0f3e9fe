//! LLM integration: HTTP client and the collaborators built on it

pub mod client;
pub mod generator;
pub mod judge;
pub mod parser;
pub mod prompt;
pub mod retry;

pub use client::LlmClient;
pub use generator::{LlmEnemyActionGenerator, LlmEnemyGenerator};
pub use judge::{LlmActionJudge, LlmActionNarrator};

use crate::battle::ports::Collaborators;
use crate::core::config::PromptsConfig;
use std::sync::Arc;

/// Wire every collaborator to one client
pub fn collaborators(client: LlmClient, prompts: &PromptsConfig) -> Collaborators {
    let client = Arc::new(client);
    Collaborators {
        judge: Arc::new(LlmActionJudge::new(
            client.clone(),
            prompts.action_judge.clone(),
        )),
        narrator: Arc::new(LlmActionNarrator::new(
            client.clone(),
            prompts.action_narration.clone(),
        )),
        enemy_action_generator: Arc::new(LlmEnemyActionGenerator::new(
            client.clone(),
            prompts.enemy_next_action.clone(),
        )),
        enemy_generator: Some(Arc::new(LlmEnemyGenerator::new(
            client,
            prompts.enemy_generation.clone(),
        ))),
    }
}
