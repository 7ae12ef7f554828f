use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tavern_quest::{
    LUMBER, MaterialCatalog, QuestDefinition, QuestLedger, QuestRunner, QuestSpec,
    ScriptedParticipant,
};
use tavern_types::TavernError;

use crate::config::TavernConfig;

/// Handle the `quest` command: replay scripted submissions against a quest.
pub async fn handle(
    quest_path: Option<&Path>,
    agent: &str,
    script: &Path,
    config: &TavernConfig,
) -> Result<()> {
    let catalog = Arc::new(config.catalog());
    let definition = match quest_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read quest file {}", path.display()))?;
            let spec: QuestSpec = toml::from_str(&content).context("Failed to parse quest file")?;
            spec.build(&catalog)?
        }
        None => lumber_hunt(agent, &catalog)?,
    };

    let content = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let mut participant = ScriptedParticipant::new(&definition.agent_id, parse_script(&content));

    let mut ledger = QuestLedger::new(Arc::new(definition), catalog)
        .with_policy(config.quest.unrecognized_material);
    println!("{}", ledger.definition().introduction());

    let runner = QuestRunner::new(config.quest.clone());
    match runner.run(&mut ledger, &mut participant).await {
        Ok(outcome) => {
            if let Some(result) = &outcome.last_result {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            if outcome.accomplished {
                println!("Quest accomplished in {} round(s).", outcome.rounds);
            } else {
                println!("Quest not accomplished after {} round(s).", outcome.rounds);
            }
        }
        Err(TavernError::Agent(reason)) => {
            println!("Script ended before the quest was accomplished: {reason}");
        }
        Err(e) => return Err(e.into()),
    }

    println!();
    println!("Status: {}", ledger.status_snapshot());
    for record in ledger.history() {
        println!(
            "  {} {}  credited={:?} dropped={:?}",
            record.recorded_at.format("%H:%M:%S"),
            record.agent_id,
            record.credited,
            record.dropped
        );
    }
    Ok(())
}

/// One reply per non-empty line. Lines that are not JSON are passed through
/// as strings so the ledger reports them as malformed submissions.
fn parse_script(content: &str) -> Vec<Value> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.to_string()))
        })
        .collect()
}

fn lumber_hunt(agent_id: &str, catalog: &MaterialCatalog) -> tavern_types::Result<QuestDefinition> {
    let lumber = catalog
        .resolve(LUMBER)
        .cloned()
        .ok_or_else(|| TavernError::UnknownMaterial(LUMBER.to_string()))?;
    QuestDefinition::new("lumber_hunt", agent_id)
        .with_description("Submit 10 lumber to build your first timber house")
        .with_hint(
            "Submit quest materials. Make sure your response format complies with required format.",
        )
        .require(lumber, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let replies = parse_script(
            "{\"agent_id\": \"npc1\", \"material_submission\": {\"lumber\": 5}}\n\n  not json  \n",
        );
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["material_submission"]["lumber"], 5);
        assert_eq!(replies[1], Value::String("not json".into()));
    }

    #[test]
    fn test_builtin_quest() {
        let quest = lumber_hunt("npc7", &MaterialCatalog::builtin()).unwrap();
        assert_eq!(quest.agent_id, "npc7");
        assert_eq!(quest.requirements()[0].quantity, 10);
    }
}
