use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tavern_types::TavernError;
use uuid::Uuid;

/// Materials handed in by an agent against a quest.
///
/// Quantities of zero or less are ignored when the request is applied.
/// Materials are credited in the order they were listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub agent_id: String,
    pub material_submission: IndexMap<String, i64>,
}

impl SubmissionRequest {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            material_submission: IndexMap::new(),
        }
    }

    pub fn with_material(mut self, material_id: impl Into<String>, quantity: i64) -> Self {
        self.material_submission.insert(material_id.into(), quantity);
        self
    }
}

/// Reply to a submission, shaped for interpolation into an agent prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResult {
    pub valid: bool,
    pub finished: bool,
    pub message: String,
    /// Present only on valid submissions that did not finish the quest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SubmissionResult {
    pub fn rejected(error: &TavernError) -> Self {
        Self {
            valid: false,
            finished: false,
            message: error.to_string(),
            hint: None,
        }
    }

    pub fn finished(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            finished: true,
            message: message.into(),
            hint: None,
        }
    }

    pub fn unfinished(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            valid: true,
            finished: false,
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// What to do with positive quantities of materials the quest does not require.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedMaterialPolicy {
    /// Accept the submission and give no credit for the material.
    #[default]
    Drop,
    /// Reject the whole submission.
    Reject,
}

/// Cumulative submitted quantities, in the order materials were first credited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    entries: Vec<(String, u64)>,
}

impl StatusSnapshot {
    pub(crate) fn new(entries: Vec<(String, u64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, material_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == material_id)
            .map(|(_, qty)| *qty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StatusSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, qty) in &self.entries {
            map.serialize_entry(id, qty)?;
        }
        map.end()
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// An accepted submission as recorded in the ledger history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub agent_id: String,
    /// Material ids and the quantity credited for each.
    pub credited: Vec<(String, u64)>,
    /// Material ids that were submitted but earned no credit.
    pub dropped: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}
