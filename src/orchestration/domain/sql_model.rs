//! Realised models for the schema-synchronising SQL backend.

use super::OrchestrationDomainError;
use serde::{Deserialize, Serialize};

/// One column of a realised SQL model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlAttribute {
    name: String,
    sql_type: String,
    nullable: bool,
    primary_key: bool,
}

impl SqlAttribute {
    /// Creates a nullable, non-key attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_owned(),
            sql_type: sql_type.into().trim().to_owned(),
            nullable: true,
            primary_key: false,
        }
    }

    /// Marks the attribute as part of the primary key (implies `NOT NULL`).
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the attribute as `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the SQL column type.
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// Returns whether the column accepts `NULL`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns whether the column is part of the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// A model realised by a [`super::ModelFactory`] against a sync-SQL
/// connection, ready for schema synchronisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlModel {
    name: String,
    table: String,
    attributes: Vec<SqlAttribute>,
    associations: Vec<String>,
}

impl SqlModel {
    /// Creates a model whose table name equals the model name.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError::EmptyModelName`] when the name is
    /// empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, OrchestrationDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(OrchestrationDomainError::EmptyModelName);
        }
        Ok(Self {
            table: normalized.clone(),
            name: normalized,
            attributes: Vec::new(),
            associations: Vec::new(),
        })
    }

    /// Overrides the table name.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError::EmptyTableName`] when the table
    /// name is empty after trimming.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self, OrchestrationDomainError> {
        let normalized = table.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(OrchestrationDomainError::EmptyTableName(self.name));
        }
        self.table = normalized;
        Ok(self)
    }

    /// Appends an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationDomainError::EmptyAttributeName`] for a blank
    /// attribute name or [`OrchestrationDomainError::DuplicateAttribute`]
    /// when the name is already declared.
    pub fn with_attribute(
        mut self,
        attribute: SqlAttribute,
    ) -> Result<Self, OrchestrationDomainError> {
        if attribute.name.is_empty() {
            return Err(OrchestrationDomainError::EmptyAttributeName { model: self.name });
        }
        if self.attributes.iter().any(|a| a.name == attribute.name) {
            return Err(OrchestrationDomainError::DuplicateAttribute {
                model: self.name,
                attribute: attribute.name,
            });
        }
        self.attributes.push(attribute);
        Ok(self)
    }

    /// Records an association with another model of the same backend.
    #[must_use]
    pub fn with_association(mut self, target: impl Into<String>) -> Self {
        self.associations.push(target.into());
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the declared attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[SqlAttribute] {
        &self.attributes
    }

    /// Returns the names of associated models.
    #[must_use]
    pub fn associations(&self) -> &[String] {
        &self.associations
    }

    /// Renders an idempotent `CREATE TABLE IF NOT EXISTS` statement.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let mut columns: Vec<String> = self
            .attributes
            .iter()
            .map(|attribute| {
                let mut column =
                    format!("{} {}", quote_identifier(&attribute.name), attribute.sql_type);
                if !attribute.nullable {
                    column.push_str(" NOT NULL");
                }
                column
            })
            .collect();

        let keys: Vec<String> = self
            .attributes
            .iter()
            .filter(|attribute| attribute.primary_key)
            .map(|attribute| quote_identifier(&attribute.name))
            .collect();
        if !keys.is_empty() {
            columns.push(format!("PRIMARY KEY ({})", keys.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_identifier(&self.table),
            columns.join(", ")
        )
    }
}

/// Quotes a SQL identifier, doubling embedded quotes.
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
