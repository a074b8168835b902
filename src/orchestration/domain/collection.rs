//! Collection definitions loaded into the document store.

use super::ModelDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document-store collection derived from an exported model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDefinition {
    name: String,
    identity: String,
    table_name: Option<String>,
    attributes: Map<String, Value>,
}

impl CollectionDefinition {
    /// Derives a collection from the model exported under `name`.
    ///
    /// The identity falls back to the lowercased export name when the model
    /// carries only a table-name marker.
    #[must_use]
    pub fn from_model(name: &str, model: &ModelDefinition) -> Self {
        let markers = model.markers();
        Self {
            name: name.to_owned(),
            identity: markers
                .identity()
                .map_or_else(|| name.to_lowercase(), str::to_lowercase),
            table_name: markers.table_name().map(str::to_owned),
            attributes: model.attribute_map().cloned().unwrap_or_default(),
        }
    }

    /// Returns the export name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the table-name marker, if any.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Returns the declared attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}
