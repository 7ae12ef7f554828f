use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tavern_types::{MaterialType, Result, TavernError};
use uuid::Uuid;

use crate::catalog::MaterialCatalog;
use crate::definition::{QuestDefinition, Requirement};
use crate::submission::{
    StatusSnapshot, SubmissionRecord, SubmissionRequest, SubmissionResult,
    UnrecognizedMaterialPolicy,
};

/// Running totals of materials submitted against one quest.
///
/// Totals only ever grow. A rejected submission leaves the ledger untouched.
#[derive(Debug, Clone)]
pub struct QuestLedger {
    definition: Arc<QuestDefinition>,
    catalog: Arc<MaterialCatalog>,
    policy: UnrecognizedMaterialPolicy,
    totals: Vec<(MaterialType, u64)>,
    history: Vec<SubmissionRecord>,
}

impl QuestLedger {
    pub fn new(definition: Arc<QuestDefinition>, catalog: Arc<MaterialCatalog>) -> Self {
        Self {
            definition,
            catalog,
            policy: UnrecognizedMaterialPolicy::default(),
            totals: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: UnrecognizedMaterialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn definition(&self) -> &QuestDefinition {
        &self.definition
    }

    pub fn policy(&self) -> UnrecognizedMaterialPolicy {
        self.policy
    }

    /// Apply a typed submission and report the quest status.
    pub fn submit(&mut self, request: &SubmissionRequest) -> SubmissionResult {
        match self.apply(request) {
            Ok(result) => result,
            Err(e) => self.reject(e),
        }
    }

    /// Apply an untyped submission record, e.g. a parsed agent reply.
    /// Shape errors are reported in the result, never returned.
    pub fn submit_value(&mut self, value: &Value) -> SubmissionResult {
        match parse_request(value, &self.definition.agent_id) {
            Ok(request) => self.submit(&request),
            Err(e) => self.reject(e),
        }
    }

    /// True once every required material has reached its quantity.
    pub fn is_accomplished(&self) -> bool {
        self.definition
            .requirements()
            .iter()
            .all(|r| self.quantity_of(&r.material) >= r.quantity)
    }

    pub fn quantity_of(&self, material: &MaterialType) -> u64 {
        self.totals
            .iter()
            .find(|(m, _)| m == material)
            .map(|(_, qty)| *qty)
            .unwrap_or(0)
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::new(
            self.totals
                .iter()
                .map(|(m, qty)| (m.to_string(), *qty))
                .collect(),
        )
    }

    /// Requirements that are still short, with the missing quantity.
    pub fn outstanding(&self) -> Vec<Requirement> {
        self.definition
            .requirements()
            .iter()
            .filter_map(|r| {
                let missing = r.quantity.saturating_sub(self.quantity_of(&r.material));
                (missing > 0).then(|| Requirement {
                    material: r.material.clone(),
                    quantity: missing,
                })
            })
            .collect()
    }

    /// Accepted submissions, oldest first.
    pub fn history(&self) -> &[SubmissionRecord] {
        &self.history
    }

    fn apply(&mut self, request: &SubmissionRequest) -> Result<SubmissionResult> {
        check_owner(&request.agent_id, &self.definition.agent_id)?;

        let mut credits: Vec<(MaterialType, u64)> = Vec::new();
        let mut dropped = Vec::new();
        for (id, &quantity) in &request.material_submission {
            if quantity <= 0 {
                continue;
            }
            match self
                .catalog
                .resolve(id)
                .filter(|m| self.definition.requires(m))
            {
                Some(material) => credits.push((material.clone(), quantity as u64)),
                None => dropped.push(id.clone()),
            }
        }

        if !dropped.is_empty() && self.policy == UnrecognizedMaterialPolicy::Reject {
            return Err(TavernError::InvalidSubmission(format!(
                "materials not required by this quest: {}",
                dropped.join(", ")
            )));
        }
        if !dropped.is_empty() {
            tracing::debug!(
                quest = %self.definition.name,
                dropped = ?dropped,
                "Dropping materials the quest does not require"
            );
        }

        for (material, quantity) in &credits {
            self.credit(material, *quantity);
        }

        self.history.push(SubmissionRecord {
            id: Uuid::new_v4(),
            agent_id: request.agent_id.clone(),
            credited: credits
                .into_iter()
                .map(|(m, qty)| (m.id, qty))
                .collect(),
            dropped,
            recorded_at: Utc::now(),
        });

        Ok(self.evaluate())
    }

    fn credit(&mut self, material: &MaterialType, quantity: u64) {
        match self.totals.iter_mut().find(|(m, _)| m == material) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => self.totals.push((material.clone(), quantity)),
        }
    }

    fn evaluate(&self) -> SubmissionResult {
        if self.is_accomplished() {
            tracing::info!(quest = %self.definition.name, "Quest accomplished");
            SubmissionResult::finished(&self.definition.finished_msg)
        } else {
            let status = self.status_snapshot().to_string();
            tracing::info!(quest = %self.definition.name, status = %status, "Quest not finished yet");
            SubmissionResult::unfinished(
                self.definition.render_unfinished(&status),
                &self.definition.hint,
            )
        }
    }

    fn reject(&self, error: TavernError) -> SubmissionResult {
        tracing::warn!(quest = %self.definition.name, "{error}");
        SubmissionResult::rejected(&error)
    }
}

fn invalid(reason: impl Into<String>) -> TavernError {
    TavernError::InvalidSubmission(reason.into())
}

fn check_owner(agent_id: &str, owner: &str) -> Result<()> {
    if agent_id != owner {
        return Err(invalid(format!(
            "agent_id '{agent_id}' does not own this quest"
        )));
    }
    Ok(())
}

/// Validate the shape of an untyped submission, in order: record, owner, materials.
fn parse_request(value: &Value, owner: &str) -> Result<SubmissionRequest> {
    let record = value
        .as_object()
        .ok_or_else(|| invalid("submission must be a structured record"))?;

    let agent_id = record
        .get("agent_id")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("agent_id not existed or invalid"))?;
    check_owner(agent_id, owner)?;

    let materials = record
        .get("material_submission")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("material_submission not existed or not a mapping"))?;

    let mut request = SubmissionRequest::new(agent_id);
    for (id, quantity) in materials {
        let quantity = quantity
            .as_i64()
            .ok_or_else(|| invalid(format!("quantity of '{id}' must be an integer")))?;
        request = request.with_material(id, quantity);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LUMBER, STONE};
    use proptest::prelude::*;
    use serde_json::json;

    fn lumber_hunt() -> QuestLedger {
        let catalog = Arc::new(MaterialCatalog::builtin());
        let lumber = catalog.resolve(LUMBER).cloned().unwrap();
        let quest = QuestDefinition::new("lumber_hunt", "npc1")
            .with_description("Get 10 lumber to build your first timber house")
            .with_hint("Felwood is a good place to find lumber.")
            .require(lumber, 10)
            .unwrap();
        QuestLedger::new(Arc::new(quest), catalog)
    }

    fn lumber() -> MaterialType {
        MaterialCatalog::builtin().resolve(LUMBER).cloned().unwrap()
    }

    #[test]
    fn test_two_submissions_finish_quest() {
        let mut ledger = lumber_hunt();
        let submission = SubmissionRequest::new("npc1").with_material(LUMBER, 5);

        let first = ledger.submit(&submission);
        assert!(first.valid);
        assert!(!first.finished);
        assert_eq!(
            first.message,
            r#"The quest is not finished yet. Current status: {"lumber":5}"#
        );
        assert_eq!(
            first.hint.as_deref(),
            Some("Felwood is a good place to find lumber.")
        );

        let second = ledger.submit(&submission);
        assert!(second.valid);
        assert!(second.finished);
        assert_eq!(second.message, "You have finished the quest!");
        assert!(second.hint.is_none());
        assert!(ledger.is_accomplished());
        assert_eq!(ledger.history().len(), 2);
    }

    #[test]
    fn test_wrong_owner_rejected_without_mutation() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit(&SubmissionRequest::new("npc2").with_material(LUMBER, 10));
        assert!(!result.valid);
        assert!(!result.finished);
        assert!(result.message.starts_with("Invalid submission: "));
        assert!(result.hint.is_none());
        assert!(ledger.status_snapshot().is_empty());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_owner_is_case_sensitive() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit(&SubmissionRequest::new("NPC1").with_material(LUMBER, 10));
        assert!(!result.valid);
    }

    #[test]
    fn test_unrequired_material_gets_no_credit() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit(&SubmissionRequest::new("npc1").with_material(STONE, 5));
        assert!(result.valid);
        assert!(!result.finished);
        assert!(ledger.status_snapshot().is_empty());
        assert_eq!(ledger.history()[0].dropped, vec![STONE.to_string()]);
    }

    #[test]
    fn test_unknown_material_dropped() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit(&SubmissionRequest::new("npc1").with_material("mithril", 5));
        assert!(result.valid);
        assert!(ledger.status_snapshot().is_empty());
    }

    #[test]
    fn test_reject_policy_leaves_ledger_untouched() {
        let mut ledger = lumber_hunt().with_policy(UnrecognizedMaterialPolicy::Reject);
        let request = SubmissionRequest::new("npc1")
            .with_material(LUMBER, 4)
            .with_material(STONE, 5);
        let result = ledger.submit(&request);
        assert!(!result.valid);
        assert!(result.message.contains("stone"));
        assert_eq!(ledger.quantity_of(&lumber()), 0);
    }

    #[test]
    fn test_non_positive_quantities_skipped() {
        let mut ledger = lumber_hunt().with_policy(UnrecognizedMaterialPolicy::Reject);
        let request = SubmissionRequest::new("npc1")
            .with_material(LUMBER, -3)
            .with_material(STONE, 0);
        let result = ledger.submit(&request);
        assert!(result.valid);
        assert_eq!(ledger.quantity_of(&lumber()), 0);
    }

    #[test]
    fn test_empty_requirement_is_accomplished() {
        let quest = QuestDefinition::new("nothing", "npc1");
        let mut ledger = QuestLedger::new(Arc::new(quest), Arc::new(MaterialCatalog::builtin()));
        assert!(ledger.is_accomplished());
        let result = ledger.submit(&SubmissionRequest::new("npc1"));
        assert!(result.finished);
    }

    #[test]
    fn test_outstanding() {
        let mut ledger = lumber_hunt();
        ledger.submit(&SubmissionRequest::new("npc1").with_material(LUMBER, 7));
        let outstanding = ledger.outstanding();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].quantity, 3);

        ledger.submit(&SubmissionRequest::new("npc1").with_material(LUMBER, 7));
        assert!(ledger.outstanding().is_empty());
        assert_eq!(ledger.quantity_of(&lumber()), 14);
    }

    #[test]
    fn test_submit_value_validation_order() {
        let mut ledger = lumber_hunt();

        let result = ledger.submit_value(&json!("lumber: 10"));
        assert_eq!(
            result.message,
            "Invalid submission: submission must be a structured record"
        );

        // Owner is checked before the material mapping.
        let result = ledger.submit_value(&json!({"agent_id": "npc2"}));
        assert_eq!(
            result.message,
            "Invalid submission: agent_id 'npc2' does not own this quest"
        );

        let result = ledger.submit_value(&json!({"material_submission": {"lumber": 1}}));
        assert_eq!(
            result.message,
            "Invalid submission: agent_id not existed or invalid"
        );

        let result = ledger.submit_value(&json!({"agent_id": "npc1", "material_submission": [1]}));
        assert_eq!(
            result.message,
            "Invalid submission: material_submission not existed or not a mapping"
        );

        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_submit_value_rejects_fractional_quantity_atomically() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit_value(&json!({
            "agent_id": "npc1",
            "material_submission": {"lumber": 5, "stone": 1.5}
        }));
        assert!(!result.valid);
        assert_eq!(ledger.quantity_of(&lumber()), 0);
    }

    #[test]
    fn test_submit_value_accepts_agent_reply() {
        let mut ledger = lumber_hunt();
        let result = ledger.submit_value(&json!({
            "speak": "The quest needs 10 lumber, I have 10.",
            "agent_id": "npc1",
            "material_submission": {"lumber": 10}
        }));
        assert!(result.finished);
    }

    #[test]
    fn test_snapshot_order_follows_first_credit() {
        let catalog = Arc::new(MaterialCatalog::builtin());
        let quest = QuestDefinition::new("build", "npc1")
            .require(catalog.resolve(LUMBER).cloned().unwrap(), 10)
            .unwrap()
            .require(catalog.resolve(STONE).cloned().unwrap(), 10)
            .unwrap();
        let mut ledger = QuestLedger::new(Arc::new(quest), catalog);
        ledger.submit(&SubmissionRequest::new("npc1").with_material(STONE, 1));
        ledger.submit(&SubmissionRequest::new("npc1").with_material(LUMBER, 2));
        ledger.submit(&SubmissionRequest::new("npc1").with_material(STONE, 1));
        let ids: Vec<_> = ledger.status_snapshot().iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, vec![STONE, LUMBER]);
    }

    #[test]
    fn test_single_submission_keeps_listed_order() {
        let catalog = Arc::new(MaterialCatalog::builtin());
        let quest = QuestDefinition::new("build", "npc1")
            .require(catalog.resolve(LUMBER).cloned().unwrap(), 10)
            .unwrap()
            .require(catalog.resolve(STONE).cloned().unwrap(), 10)
            .unwrap();
        let mut ledger = QuestLedger::new(Arc::new(quest), catalog);

        let result = ledger.submit_value(&json!({
            "agent_id": "npc1",
            "material_submission": {"stone": 1, "lumber": 2}
        }));
        assert!(result.valid);
        assert_eq!(
            result.message,
            r#"The quest is not finished yet. Current status: {"stone":1,"lumber":2}"#
        );
        assert_eq!(
            ledger.history()[0].credited,
            vec![(STONE.to_string(), 1), (LUMBER.to_string(), 2)]
        );
    }

    proptest! {
        #[test]
        fn prop_totals_never_decrease(
            submissions in proptest::collection::vec(
                (prop_oneof![Just("npc1"), Just("npc2")], -20i64..20, -20i64..20),
                0..30,
            )
        ) {
            let catalog = Arc::new(MaterialCatalog::builtin());
            let lumber = catalog.resolve(LUMBER).cloned().unwrap();
            let quest = QuestDefinition::new("prop", "npc1").require(lumber.clone(), 50).unwrap();
            let mut ledger = QuestLedger::new(Arc::new(quest), catalog);

            let mut previous = 0;
            for (agent, lumber_qty, stone_qty) in submissions {
                let request = SubmissionRequest::new(agent)
                    .with_material(LUMBER, lumber_qty)
                    .with_material(STONE, stone_qty);
                let result = ledger.submit(&request);
                let current = ledger.quantity_of(&lumber);

                prop_assert!(current >= previous);
                if agent != "npc1" {
                    prop_assert!(!result.valid);
                    prop_assert_eq!(current, previous);
                } else {
                    prop_assert_eq!(current, previous + lumber_qty.max(0) as u64);
                }
                prop_assert_eq!(result.finished, ledger.is_accomplished() && result.valid);
                prop_assert_eq!(ledger.is_accomplished(), current >= 50);
                previous = current;
            }
        }
    }
}
