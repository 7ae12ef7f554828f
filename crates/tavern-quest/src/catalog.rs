use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tavern_types::{MaterialItem, MaterialType, Result, TavernError};

pub const LUMBER: &str = "lumber";
pub const STONE: &str = "stone";

/// Registry mapping material type identifiers to their descriptors.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    entries: HashMap<String, MaterialType>,
}

/// Serialized form of a catalog entry, as found in config files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<MaterialSpec> for MaterialType {
    fn from(spec: MaterialSpec) -> Self {
        let name = spec.name.unwrap_or_else(|| spec.id.clone());
        MaterialType::new(spec.id, name, spec.description)
    }
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with the materials every game knows about.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(MaterialType::new(LUMBER, "lumber", "A piece of wood."));
        catalog.register(MaterialType::new(STONE, "stone", "A rough block of stone."));
        catalog
    }

    /// Add a material type, replacing any existing entry with the same id.
    pub fn register(&mut self, material: MaterialType) -> Option<MaterialType> {
        self.entries.insert(material.id.clone(), material)
    }

    pub fn extend(&mut self, specs: impl IntoIterator<Item = MaterialSpec>) {
        for spec in specs {
            self.register(spec.into());
        }
    }

    pub fn resolve(&self, id: &str) -> Option<&MaterialType> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mint `count` individual items of a material for `possessor_id`.
    pub fn create_items(
        &self,
        id: &str,
        possessor_id: &str,
        count: usize,
    ) -> Result<Vec<MaterialItem>> {
        let material = self
            .resolve(id)
            .ok_or_else(|| TavernError::UnknownMaterial(id.to_string()))?;
        Ok((0..count)
            .map(|_| MaterialItem::new(material.clone(), possessor_id))
            .collect())
    }
}
