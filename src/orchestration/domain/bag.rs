//! Ordered bag of exported model definitions.

use super::ModelDefinition;
use std::sync::Arc;

/// Substring a loader route must contain to contribute models.
const MODEL_ROUTE_MARKER: &str = "model";

/// One named export of a [`ModelBag`].
#[derive(Debug, Clone)]
pub struct ModelEntry {
    name: String,
    definition: Option<Arc<ModelDefinition>>,
}

impl ModelEntry {
    /// Returns the export name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the definition, or `None` for a null export.
    #[must_use]
    pub const fn definition(&self) -> Option<&Arc<ModelDefinition>> {
        self.definition.as_ref()
    }
}

/// Normalised mapping from export name to model definition.
///
/// Entries keep insertion order. Inserting a name that already exists
/// replaces the definition in place.
#[derive(Debug, Clone, Default)]
pub struct ModelBag {
    entries: Vec<ModelEntry>,
}

impl ModelBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalises a loader's route → exports structure into one bag.
    ///
    /// Only routes whose name contains `"model"` contribute; a later route
    /// overwrites an earlier export with the same name.
    #[must_use]
    pub fn from_routes<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = (S, Self)>,
        S: AsRef<str>,
    {
        let mut merged = Self::new();
        for (route, exports) in routes {
            if !route.as_ref().contains(MODEL_ROUTE_MARKER) {
                continue;
            }
            for entry in exports.entries {
                merged.upsert(entry.name, entry.definition);
            }
        }
        merged
    }

    /// Inserts a definition under `name`.
    pub fn insert(&mut self, name: impl Into<String>, definition: ModelDefinition) {
        self.upsert(name.into(), Some(Arc::new(definition)));
    }

    /// Inserts an already shared definition under `name`.
    ///
    /// Sharing one `Arc` under several names lets the document bucket
    /// deduplicate by identity.
    pub fn insert_shared(&mut self, name: impl Into<String>, definition: Arc<ModelDefinition>) {
        self.upsert(name.into(), Some(definition));
    }

    /// Inserts a null export under `name`.
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.upsert(name.into(), None);
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, definition: ModelDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Returns the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.iter()
    }

    /// Returns the definition stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<ModelDefinition>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.definition.as_ref())
    }

    /// Returns the number of entries, null exports included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(&mut self, name: String, definition: Option<Arc<ModelDefinition>>) {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.name == name) {
            existing.definition = definition;
        } else {
            self.entries.push(ModelEntry { name, definition });
        }
    }
}
