//! LLM-backed judge and narrator

use crate::battle::ports::{ActionContext, ActionJudge, ActionJudgment, ActionNarrator};
use crate::core::error::Result;
use crate::llm::client::LlmClient;
use crate::llm::parser::parse_judgment;
use crate::llm::prompt::{fill, GAME_MASTER_SYSTEM};
use crate::llm::retry::{with_retries, MAX_ATTEMPTS};
use async_trait::async_trait;
use std::sync::Arc;

fn context_values(context: &ActionContext) -> [(&'static str, String); 5] {
    [
        ("attacker_name", context.attacker.name.clone()),
        ("attacker", context.attacker.battle_context()),
        ("defender", context.defender.battle_context()),
        ("battle_history", context.battle_history.clone()),
        ("proposed_action", context.proposed_action.clone()),
    ]
}

fn render(template: &str, values: &[(&'static str, String)]) -> String {
    let pairs: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
    fill(template, &pairs)
}

pub struct LlmActionJudge {
    client: Arc<LlmClient>,
    template: String,
}

impl LlmActionJudge {
    pub fn new(client: Arc<LlmClient>, template: String) -> Self {
        Self { client, template }
    }
}

#[async_trait]
impl ActionJudge for LlmActionJudge {
    async fn judge(&self, context: &ActionContext) -> Result<ActionJudgment> {
        let prompt = render(&self.template, &context_values(context));
        let prompt = &prompt;
        with_retries("action judge", MAX_ATTEMPTS, || async move {
            let response = self.client.complete(GAME_MASTER_SYSTEM, prompt).await?;
            parse_judgment(&response)
        })
        .await
    }
}

pub struct LlmActionNarrator {
    client: Arc<LlmClient>,
    template: String,
}

impl LlmActionNarrator {
    pub fn new(client: Arc<LlmClient>, template: String) -> Self {
        Self { client, template }
    }
}

#[async_trait]
impl ActionNarrator for LlmActionNarrator {
    async fn describe(
        &self,
        context: &ActionContext,
        judgment: &ActionJudgment,
        total_dmg: i64,
    ) -> Result<String> {
        let mut values = context_values(context).to_vec();
        values.push(("feasibility", format!("{:.2}", judgment.feasibility)));
        values.push((
            "potential_damage",
            format!("{:.2}", judgment.potential_damage),
        ));
        values.push(("total_dmg", total_dmg.to_string()));
        let prompt = render(&self.template, &values);
        let response = self.client.complete(GAME_MASTER_SYSTEM, &prompt).await?;
        Ok(response.trim().to_string())
    }
}
