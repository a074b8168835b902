//! Assignment of exported models to backend buckets.

use crate::orchestration::domain::{
    ClassificationBuckets, DEFAULT_OMITTED_MODEL, ModelBag, ModelBody,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Splits a [`ModelBag`] into disjoint per-backend buckets.
///
/// Each non-null, non-omitted entry lands in exactly one bucket:
///
/// 1. an identity or table-name marker claims it for the document store;
/// 2. otherwise a sync-SQL factory body claims it for the sync-SQL backend;
/// 3. otherwise an entity class body claims it for the entity-SQL backend;
/// 4. anything else is recorded as unclassified.
///
/// Markers are checked before the body, so a marked factory still belongs to
/// the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelClassifier {
    omit: BTreeSet<String>,
}

impl Default for ModelClassifier {
    fn default() -> Self {
        Self::new([DEFAULT_OMITTED_MODEL])
    }
}

impl ModelClassifier {
    /// Creates a classifier that ignores every name in `omit`.
    #[must_use]
    pub fn new<I, S>(omit: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            omit: omit.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns whether `name` is ignored.
    #[must_use]
    pub fn is_omitted(&self, name: &str) -> bool {
        self.omit.contains(name)
    }

    /// Classifies every entry of `bag`.
    #[must_use]
    pub fn classify(&self, bag: &ModelBag) -> ClassificationBuckets {
        let mut buckets = ClassificationBuckets::new();
        for entry in bag.iter() {
            let Some(definition) = entry.definition() else {
                continue;
            };
            let name = entry.name();
            if self.is_omitted(name) {
                continue;
            }

            if definition.markers().is_present() {
                buckets.add_document(name, definition);
                continue;
            }

            if !definition.body().is_invocable() {
                buckets.add_unclassified(name);
                continue;
            }

            match definition.body() {
                ModelBody::SyncFactory(factory) => buckets.add_sync_sql(name, Arc::clone(factory)),
                ModelBody::EntityClass(schema) => buckets.add_entity_sql(name, schema.clone()),
                ModelBody::Function(_) | ModelBody::Attributes(_) => {
                    buckets.add_unclassified(name);
                }
            }
        }
        buckets
    }
}
