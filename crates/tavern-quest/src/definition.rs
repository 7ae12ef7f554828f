use serde::{Deserialize, Serialize};
use tavern_types::{MaterialType, Result, TavernError};
use uuid::Uuid;

use crate::catalog::MaterialCatalog;

/// Placeholder in the unfinished-message template that receives the ledger status.
pub const CURRENT_STATUS_PLACEHOLDER: &str = "{current_status}";

const DEFAULT_NAME: &str = "basic_quest";
const DEFAULT_DESCRIPTION: &str = "It's a quest base";
const DEFAULT_HINT: &str = "You need to do something.";
const DEFAULT_UNFINISHED_MSG: &str =
    "The quest is not finished yet. Current status: {current_status}";
const DEFAULT_FINISHED_MSG: &str = "You have finished the quest!";

/// One required material and how many units of it must be submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub material: MaterialType,
    pub quantity: u64,
}

/// Immutable description of a quest goal owned by a single agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub id: Uuid,
    pub name: String,
    /// The only agent allowed to submit materials for this quest.
    pub agent_id: String,
    pub description: String,
    pub hint: String,
    pub unfinished_msg: String,
    pub finished_msg: String,
    requirements: Vec<Requirement>,
}

impl QuestDefinition {
    pub fn new(name: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            agent_id: agent_id.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            hint: DEFAULT_HINT.to_string(),
            unfinished_msg: DEFAULT_UNFINISHED_MSG.to_string(),
            finished_msg: DEFAULT_FINISHED_MSG.to_string(),
            requirements: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_unfinished_msg(mut self, template: impl Into<String>) -> Self {
        self.unfinished_msg = template.into();
        self
    }

    pub fn with_finished_msg(mut self, msg: impl Into<String>) -> Self {
        self.finished_msg = msg.into();
        self
    }

    /// Require `quantity` units of `material`. Requiring the same material
    /// twice replaces the earlier quantity.
    pub fn require(mut self, material: MaterialType, quantity: u64) -> Result<Self> {
        if quantity == 0 {
            return Err(TavernError::InvalidQuest(format!(
                "required quantity for '{material}' must be greater than zero"
            )));
        }
        match self.requirements.iter_mut().find(|r| r.material == material) {
            Some(existing) => existing.quantity = quantity,
            None => self.requirements.push(Requirement { material, quantity }),
        }
        Ok(self)
    }

    /// Requirements in the order they were declared.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn required_quantity(&self, material: &MaterialType) -> Option<u64> {
        self.requirements
            .iter()
            .find(|r| &r.material == material)
            .map(|r| r.quantity)
    }

    pub fn requires(&self, material: &MaterialType) -> bool {
        self.required_quantity(material).is_some()
    }

    /// One-line summary handed to the agent when the quest is assigned.
    pub fn introduction(&self) -> String {
        let requirement = self
            .requirements
            .iter()
            .map(|r| format!("{}: {}", r.material, r.quantity))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}: {}. requirement: {{{}}}",
            self.name, self.description, requirement
        )
    }

    /// Fill the unfinished-message template with a rendered status.
    pub fn render_unfinished(&self, current_status: &str) -> String {
        self.unfinished_msg
            .replace(CURRENT_STATUS_PLACEHOLDER, current_status)
    }
}

/// A material requirement as written in a quest file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementSpec {
    pub material: String,
    pub quantity: u64,
}

/// Quest description loaded from configuration, resolved against a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestSpec {
    #[serde(default = "default_name")]
    pub name: String,
    pub agent_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub unfinished_msg: Option<String>,
    #[serde(default)]
    pub finished_msg: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementSpec>,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl QuestSpec {
    pub fn build(&self, catalog: &MaterialCatalog) -> Result<QuestDefinition> {
        let mut quest = QuestDefinition::new(&self.name, &self.agent_id);
        if let Some(description) = &self.description {
            quest = quest.with_description(description);
        }
        if let Some(hint) = &self.hint {
            quest = quest.with_hint(hint);
        }
        if let Some(template) = &self.unfinished_msg {
            quest = quest.with_unfinished_msg(template);
        }
        if let Some(msg) = &self.finished_msg {
            quest = quest.with_finished_msg(msg);
        }
        for req in &self.requirements {
            let material = catalog
                .resolve(&req.material)
                .cloned()
                .ok_or_else(|| TavernError::UnknownMaterial(req.material.clone()))?;
            quest = quest.require(material, req.quantity)?;
        }
        Ok(quest)
    }
}
