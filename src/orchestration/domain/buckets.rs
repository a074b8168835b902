//! Per-backend model buckets produced by classification.

use super::{EntitySchema, ModelDefinition, ModelFactory};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// A model owned by the document store, kept with its export name.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    name: String,
    definition: Arc<ModelDefinition>,
}

impl DocumentModel {
    /// Returns the export name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared definition.
    #[must_use]
    pub const fn definition(&self) -> &Arc<ModelDefinition> {
        &self.definition
    }
}

/// Disjoint model buckets, one per model-owning backend, plus the names
/// that no backend claimed.
#[derive(Clone, Default)]
pub struct ClassificationBuckets {
    sync_sql: BTreeMap<String, Arc<dyn ModelFactory>>,
    entity_sql: BTreeMap<String, EntitySchema>,
    document: Vec<DocumentModel>,
    unclassified: BTreeSet<String>,
}

impl ClassificationBuckets {
    /// Creates empty buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document model unless the same definition is already present.
    pub fn add_document(&mut self, name: &str, definition: &Arc<ModelDefinition>) {
        let already_present = self
            .document
            .iter()
            .any(|model| Arc::ptr_eq(&model.definition, definition));
        if !already_present {
            self.document.push(DocumentModel {
                name: name.to_owned(),
                definition: Arc::clone(definition),
            });
        }
    }

    /// Adds a sync-SQL factory; a later name wins.
    pub fn add_sync_sql(&mut self, name: &str, factory: Arc<dyn ModelFactory>) {
        self.sync_sql.insert(name.to_owned(), factory);
    }

    /// Adds an entity schema; a later name wins.
    pub fn add_entity_sql(&mut self, name: &str, schema: EntitySchema) {
        self.entity_sql.insert(name.to_owned(), schema);
    }

    /// Records a name that no backend claimed.
    pub fn add_unclassified(&mut self, name: &str) {
        self.unclassified.insert(name.to_owned());
    }

    /// Returns the sync-SQL factories keyed by export name.
    #[must_use]
    pub const fn sync_sql(&self) -> &BTreeMap<String, Arc<dyn ModelFactory>> {
        &self.sync_sql
    }

    /// Returns the entity schemas keyed by export name.
    #[must_use]
    pub const fn entity_sql(&self) -> &BTreeMap<String, EntitySchema> {
        &self.entity_sql
    }

    /// Returns the document models in classification order.
    #[must_use]
    pub fn document(&self) -> &[DocumentModel] {
        &self.document
    }

    /// Returns the unclassified export names.
    #[must_use]
    pub const fn unclassified(&self) -> &BTreeSet<String> {
        &self.unclassified
    }

    /// Returns whether every classified entry found a backend.
    #[must_use]
    pub fn is_fully_classified(&self) -> bool {
        self.unclassified.is_empty()
    }

    /// Splits the buckets into their per-backend parts.
    #[must_use]
    pub fn into_parts(self) -> BucketParts {
        BucketParts {
            sync_sql: self.sync_sql,
            entity_sql: self.entity_sql,
            document: self.document,
            unclassified: self.unclassified,
        }
    }
}

impl fmt::Debug for ClassificationBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationBuckets")
            .field("sync_sql", &self.sync_sql.keys().collect::<Vec<_>>())
            .field("entity_sql", &self.entity_sql.keys().collect::<Vec<_>>())
            .field(
                "document",
                &self.document.iter().map(DocumentModel::name).collect::<Vec<_>>(),
            )
            .field("unclassified", &self.unclassified)
            .finish()
    }
}

/// Owned per-backend parts of [`ClassificationBuckets`].
pub struct BucketParts {
    /// Sync-SQL factories keyed by export name.
    pub sync_sql: BTreeMap<String, Arc<dyn ModelFactory>>,
    /// Entity schemas keyed by export name.
    pub entity_sql: BTreeMap<String, EntitySchema>,
    /// Document models in classification order.
    pub document: Vec<DocumentModel>,
    /// Export names no backend claimed.
    pub unclassified: BTreeSet<String>,
}
