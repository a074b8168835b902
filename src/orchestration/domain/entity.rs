//! Class-style entity schemas for the entity-SQL backend.

use super::OrchestrationDomainError;
use serde::{Deserialize, Serialize};

/// One mapped column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityColumn {
    name: String,
    column_type: String,
    primary: bool,
}

impl EntityColumn {
    /// Creates a regular column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            column_type: column_type.into().trim().to_owned(),
            primary: false,
        }
    }

    /// Creates a primary-key column.
    #[must_use]
    pub fn primary(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            primary: true,
            ..Self::new(name, column_type)
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column type.
    #[must_use]
    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    /// Returns whether this is a primary-key column.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }
}

/// Declarative entity listed in an entity-SQL connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    class_name: String,
    table: Option<String>,
    columns: Vec<EntityColumn>,
}

impl EntitySchema {
    /// Creates an entity schema with no columns.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError::EmptyModelName`] when the class
    /// name is empty after trimming.
    pub fn new(class_name: impl Into<String>) -> Result<Self, OrchestrationDomainError> {
        let normalized = class_name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(OrchestrationDomainError::EmptyModelName);
        }
        Ok(Self {
            class_name: normalized,
            table: None,
            columns: Vec::new(),
        })
    }

    /// Maps the entity to an explicit table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError::EmptyAttributeName`] for a blank
    /// column name or [`OrchestrationDomainError::DuplicateAttribute`] when
    /// the column already exists.
    pub fn with_column(mut self, column: EntityColumn) -> Result<Self, OrchestrationDomainError> {
        if column.name.is_empty() {
            return Err(OrchestrationDomainError::EmptyAttributeName {
                model: self.class_name,
            });
        }
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(OrchestrationDomainError::DuplicateAttribute {
                model: self.class_name,
                attribute: column.name,
            });
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Returns the entity class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the mapped table, falling back to the class name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.class_name)
    }

    /// Returns the mapped columns.
    #[must_use]
    pub fn columns(&self) -> &[EntityColumn] {
        &self.columns
    }
}
