//! Caller-supplied model definitions.
//!
//! A [`ModelDefinition`] is what callers hand the orchestrator for every
//! exported model. Backend ownership is decided from two things only: the
//! structural markers (identity and table name) and the shape of the body.
//! Callers build bodies through explicit constructors, so no textual
//! inspection of model sources is ever needed.

use super::{EntitySchema, OrchestrationDomainError, SqlModel};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Context handed to a [`ModelFactory`] while realising its model.
#[derive(Debug, Clone, Copy)]
pub struct RealizeContext<'a> {
    model_name: &'a str,
    dialect: &'a str,
    peers: &'a [String],
}

impl<'a> RealizeContext<'a> {
    /// Creates a realisation context.
    #[must_use]
    pub const fn new(model_name: &'a str, dialect: &'a str, peers: &'a [String]) -> Self {
        Self {
            model_name,
            dialect,
            peers,
        }
    }

    /// Returns the name under which the model was exported.
    #[must_use]
    pub const fn model_name(&self) -> &'a str {
        self.model_name
    }

    /// Returns the dialect reported by the target connection.
    #[must_use]
    pub const fn dialect(&self) -> &'a str {
        self.dialect
    }

    /// Returns every model name owned by the same backend.
    #[must_use]
    pub const fn peers(&self) -> &'a [String] {
        self.peers
    }

    /// Returns whether `name` is owned by the same backend.
    #[must_use]
    pub fn has_peer(&self, name: &str) -> bool {
        self.peers.iter().any(|peer| peer == name)
    }
}

/// Invocable model factory for the schema-synchronising SQL backend.
///
/// Closures with the matching signature implement this trait.
pub trait ModelFactory: Send + Sync {
    /// Builds the model against the connection described by `context`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError`] when the model cannot be built.
    fn realize(&self, context: &RealizeContext<'_>) -> Result<SqlModel, OrchestrationDomainError>;
}

impl<F> ModelFactory for F
where
    F: Fn(&RealizeContext<'_>) -> Result<SqlModel, OrchestrationDomainError> + Send + Sync,
{
    fn realize(&self, context: &RealizeContext<'_>) -> Result<SqlModel, OrchestrationDomainError> {
        self(context)
    }
}

/// Structural markers inspected before anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMarkers {
    identity: Option<String>,
    table_name: Option<String>,
}

impl ModelMarkers {
    /// Returns the identity marker, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Returns the table-name marker, if any.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Returns whether either marker is present.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.identity.is_some() || self.table_name.is_some()
    }
}

/// The shape of a model export.
#[derive(Clone)]
pub enum ModelBody {
    /// Factory realised on a sync-SQL connection.
    SyncFactory(Arc<dyn ModelFactory>),
    /// Class-style entity constructor for the entity-SQL backend.
    EntityClass(EntitySchema),
    /// Any other callable export, carrying its exported function name.
    Function(String),
    /// Non-invocable attribute bag.
    Attributes(Map<String, Value>),
}

impl ModelBody {
    /// Returns whether the body is function-shaped.
    #[must_use]
    pub const fn is_invocable(&self) -> bool {
        !matches!(self, Self::Attributes(_))
    }
}

impl fmt::Debug for ModelBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncFactory(_) => f.write_str("SyncFactory(..)"),
            Self::EntityClass(schema) => f.debug_tuple("EntityClass").field(schema).finish(),
            Self::Function(name) => f.debug_tuple("Function").field(name).finish(),
            Self::Attributes(attributes) => {
                f.debug_tuple("Attributes").field(attributes).finish()
            }
        }
    }
}

/// Opaque, caller-owned model definition.
#[derive(Debug, Clone)]
pub struct ModelDefinition {
    markers: ModelMarkers,
    body: ModelBody,
}

impl ModelDefinition {
    /// Creates a definition from a body with no markers.
    #[must_use]
    pub fn new(body: ModelBody) -> Self {
        Self {
            markers: ModelMarkers::default(),
            body,
        }
    }

    /// Creates a sync-SQL model factory definition.
    #[must_use]
    pub fn sync_factory(factory: impl ModelFactory + 'static) -> Self {
        Self::new(ModelBody::SyncFactory(Arc::new(factory)))
    }

    /// Creates a class-style entity definition.
    #[must_use]
    pub fn entity_class(schema: EntitySchema) -> Self {
        Self::new(ModelBody::EntityClass(schema))
    }

    /// Creates a plain callable export that belongs to no backend.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(ModelBody::Function(name.into()))
    }

    /// Creates a non-invocable attribute bag.
    #[must_use]
    pub fn attributes(attributes: Map<String, Value>) -> Self {
        Self::new(ModelBody::Attributes(attributes))
    }

    /// Sets the identity marker.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.markers.identity = Some(identity.into());
        self
    }

    /// Sets the table-name marker.
    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.markers.table_name = Some(table_name.into());
        self
    }

    /// Returns the structural markers.
    #[must_use]
    pub const fn markers(&self) -> &ModelMarkers {
        &self.markers
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &ModelBody {
        &self.body
    }

    /// Returns the attribute bag for non-invocable bodies.
    #[must_use]
    pub const fn attribute_map(&self) -> Option<&Map<String, Value>> {
        match &self.body {
            ModelBody::Attributes(attributes) => Some(attributes),
            _ => None,
        }
    }
}
