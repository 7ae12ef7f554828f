use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tavern_types::{Result, TavernError};

use crate::ledger::QuestLedger;
use crate::submission::{SubmissionResult, UnrecognizedMaterialPolicy};

/// An agent working on a quest: reads a prompt, answers with a submission record.
#[async_trait]
pub trait QuestParticipant: Send {
    fn agent_id(&self) -> &str;

    async fn respond(&mut self, prompt: &str) -> Result<Value>;
}

/// Quest loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    /// Maximum number of participant replies before giving up.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    #[serde(default)]
    pub unrecognized_material: UnrecognizedMaterialPolicy,
}

fn default_max_rounds() -> u32 {
    10
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            unrecognized_material: UnrecognizedMaterialPolicy::default(),
        }
    }
}

/// How a quest run ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestOutcome {
    pub accomplished: bool,
    pub rounds: u32,
    pub last_result: Option<SubmissionResult>,
}

/// Drives the prompt → submission → status loop between a participant and a ledger.
pub struct QuestRunner {
    config: RunnerConfig,
}

impl QuestRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Opening prompt: who the agent is, the quest, and the reply format.
    pub fn briefing(agent_id: &str, ledger: &QuestLedger) -> String {
        format!(
            "{agent_id}, your goal is to complete a quest. Quest: {}. \
             Reply in the following format:\n\
             {{\n    \"speak\": \"your reasoning\",\n    \"agent_id\": \"your name\",\n    \
             \"material_submission\": {{\"material name\": quantity}}\n}}",
            ledger.definition().introduction()
        )
    }

    pub async fn run(
        &self,
        ledger: &mut QuestLedger,
        participant: &mut dyn QuestParticipant,
    ) -> Result<QuestOutcome> {
        let mut prompt = Self::briefing(participant.agent_id(), ledger);
        let mut rounds = 0;
        let mut last_result = None;

        while !ledger.is_accomplished() && rounds < self.config.max_rounds {
            rounds += 1;
            let reply = participant.respond(&prompt).await?;
            let result = ledger.submit_value(&reply);
            tracing::debug!(round = rounds, valid = result.valid, finished = result.finished, "Quest round");
            prompt = serde_json::to_string(&result)?;
            last_result = Some(result);
        }

        let accomplished = ledger.is_accomplished();
        if accomplished {
            tracing::info!(quest = %ledger.definition().name, rounds, "Congrats! The quest has been accomplished!");
        } else {
            tracing::warn!(quest = %ledger.definition().name, rounds, "Quest round limit reached");
        }

        Ok(QuestOutcome {
            accomplished,
            rounds,
            last_result,
        })
    }
}

impl Default for QuestRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

/// Participant that replays a fixed list of replies.
#[derive(Debug, Clone)]
pub struct ScriptedParticipant {
    agent_id: String,
    replies: VecDeque<Value>,
    prompts: Vec<String>,
}

impl ScriptedParticipant {
    pub fn new(agent_id: impl Into<String>, replies: impl IntoIterator<Item = Value>) -> Self {
        Self {
            agent_id: agent_id.into(),
            replies: replies.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[async_trait]
impl QuestParticipant for ScriptedParticipant {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn respond(&mut self, prompt: &str) -> Result<Value> {
        self.prompts.push(prompt.to_string());
        self.replies
            .pop_front()
            .ok_or_else(|| TavernError::Agent(format!("{} has no replies left", self.agent_id)))
    }
}
