use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A kind of material, tracked by quantity rather than identity.
///
/// Two material types are the same material when their `id`s match;
/// display name and description do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialType {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl MaterialType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

impl PartialEq for MaterialType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MaterialType {}

impl Hash for MaterialType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A single minted unit of a material, held by an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialItem {
    pub item_id: String,
    pub material: MaterialType,
    pub possessor_id: String,
}

impl MaterialItem {
    pub fn new(material: MaterialType, possessor_id: impl Into<String>) -> Self {
        Self {
            item_id: format!("{}_{}", material.name, Uuid::new_v4().simple()),
            material,
            possessor_id: possessor_id.into(),
        }
    }
}
