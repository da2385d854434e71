//! Entity type wire model and translation from the entity dictionary.

use convotrain_core::EntityDictionary;
use serde::{Deserialize, Serialize};

/// How the remote service matches entity values. Only exact-plus-synonym map
/// matching is produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "KIND_MAP")]
    Map,
}

/// One canonical value and its synonyms on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityValue {
    pub value: String,
    pub synonyms: Vec<String>,
}

/// The entity type resource sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityType {
    pub display_name: String,
    pub kind: Kind,
    pub entities: Vec<EntityValue>,
}

impl EntityType {
    /// Flattens the dictionary into one wire resource per entity type.
    ///
    /// Entities, values, and synonyms all keep their dictionary order, so the
    /// remote agent sees the same precedence the annotator used.
    pub fn from_dictionary(dict: &EntityDictionary) -> Vec<Self> {
        dict.entities()
            .map(|entity| Self {
                display_name: entity.name().to_string(),
                kind: Kind::Map,
                entities: entity
                    .values()
                    .iter()
                    .map(|value| EntityValue {
                        value: value.value().to_owned(),
                        synonyms: value.synonyms().to_vec(),
                    })
                    .collect(),
            })
            .collect()
    }
}
