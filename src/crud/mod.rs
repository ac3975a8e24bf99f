//! Table-driven CRUD engine.
//!
//! A [`CrudTable`] names a table, its integer primary key, the columns shown
//! in the grid and the editable fields. From that description the engine
//! builds parameterized SQL for list/fetch/add/edit/delete. Identifiers are
//! checked before any SQL is assembled; values are always bound.

pub mod catalog;

use std::collections::BTreeMap;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;
use crate::models::enums::FieldKind;
use crate::models::LookupOption;

/// Loader feeding a foreign-key picker.
pub type OptionLoader = fn(&Connection) -> Result<Vec<LookupOption>, DatabaseError>;

#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    #[error("{0}")]
    Validation(String),
    #[error("Row not found")]
    RowNotFound,
    #[error("{0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for CrudError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::from(e))
    }
}

/// One editable column.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub column: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip)]
    pub loader: Option<OptionLoader>,
}

impl FieldSpec {
    fn new(column: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            column: column.to_owned(),
            label: label.to_owned(),
            kind,
            required: false,
            loader: None,
        }
    }

    pub fn text(column: &str, label: &str) -> Self {
        Self::new(column, label, FieldKind::Text)
    }

    pub fn integer(column: &str, label: &str) -> Self {
        Self::new(column, label, FieldKind::Integer)
    }

    pub fn decimal(column: &str, label: &str) -> Self {
        Self::new(column, label, FieldKind::Decimal)
    }

    pub fn foreign_key(column: &str, label: &str, loader: OptionLoader) -> Self {
        Self {
            loader: Some(loader),
            ..Self::new(column, label, FieldKind::ForeignKey)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check one submitted value against this field and normalize it.
    ///
    /// Text is trimmed; blank optional text becomes NULL. Integers are
    /// widened for decimal fields.
    pub fn normalize(&self, value: Option<&FieldValue>) -> Result<FieldValue, CrudError> {
        let value = match value {
            Some(FieldValue::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    FieldValue::Null
                } else {
                    FieldValue::Text(trimmed.to_owned())
                }
            }
            Some(other) => other.clone(),
            None => FieldValue::Null,
        };

        if value.is_null() {
            if self.required {
                return Err(CrudError::Validation(match self.kind {
                    FieldKind::ForeignKey => format!("{} must be selected.", self.label),
                    _ => format!("{} is required.", self.label),
                }));
            }
            return Ok(FieldValue::Null);
        }

        match (self.kind, value) {
            (FieldKind::Text, v @ FieldValue::Text(_)) => Ok(v),
            (FieldKind::Integer | FieldKind::ForeignKey, v @ FieldValue::Integer(_)) => Ok(v),
            (FieldKind::Decimal, v @ FieldValue::Decimal(_)) => Ok(v),
            (FieldKind::Decimal, FieldValue::Integer(i)) => Ok(FieldValue::Decimal(i as f64)),
            (FieldKind::Text, _) => Err(self.type_error("text")),
            (FieldKind::Integer, _) => Err(self.type_error("an integer")),
            (FieldKind::Decimal, _) => Err(self.type_error("a number")),
            (FieldKind::ForeignKey, _) => Err(self.type_error("a selected id")),
        }
    }

    fn type_error(&self, expected: &str) -> CrudError {
        CrudError::Validation(format!("{} must be {expected}.", self.label))
    }
}

/// A cell value, as read from or written to the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn from_sql(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Decimal(f),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                Self::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Decimal(f)
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Self::Decimal(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Submitted form: column name to value.
pub type FormValues = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub key: i64,
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub columns: Vec<String>,
    pub rows: Vec<GridRow>,
}

/// Description of one table managed through the engine.
#[derive(Debug, Clone, Serialize)]
pub struct CrudTable {
    pub title: String,
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    pub fields: Vec<FieldSpec>,
}

/// Plain SQL identifier: ASCII letter or underscore, then letters, digits,
/// underscores.
pub fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_owned()))
    }
}

impl CrudTable {
    pub fn new(title: &str, table: &str, primary_key: &str, columns: &[&str]) -> Self {
        Self {
            title: title.to_owned(),
            table: table.to_owned(),
            primary_key: primary_key.to_owned(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    fn check_identifiers(&self) -> Result<(), DatabaseError> {
        validate_identifier(&self.table)?;
        validate_identifier(&self.primary_key)?;
        for column in &self.columns {
            validate_identifier(column)?;
        }
        for field in &self.fields {
            validate_identifier(&field.column)?;
        }
        Ok(())
    }

    fn select_sql(&self) -> String {
        let mut columns = vec![self.primary_key.as_str()];
        columns.extend(self.columns.iter().map(String::as_str));
        format!("SELECT {} FROM {}", columns.join(", "), self.table)
    }

    fn grid_row(&self, row: &rusqlite::Row<'_>) -> rusqlite::Result<GridRow> {
        let mut values = Vec::with_capacity(self.columns.len());
        for i in 0..self.columns.len() {
            values.push(FieldValue::from_sql(row.get_ref(i + 1)?));
        }
        Ok(GridRow {
            key: row.get(0)?,
            values,
        })
    }

    /// Validate a submitted form, in field order.
    pub fn validate(&self, form: &FormValues) -> Result<Vec<FieldValue>, CrudError> {
        self.fields
            .iter()
            .map(|field| field.normalize(form.get(&field.column)))
            .collect()
    }

    /// All rows, newest key first.
    pub fn list(&self, conn: &Connection) -> Result<Grid, CrudError> {
        self.check_identifiers()?;
        let sql = format!("{} ORDER BY {} DESC", self.select_sql(), self.primary_key);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| self.grid_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!(table = %self.table, rows = rows.len(), "Listed rows");
        Ok(Grid {
            columns: self.columns.clone(),
            rows,
        })
    }

    pub fn fetch(&self, conn: &Connection, key: i64) -> Result<GridRow, CrudError> {
        self.check_identifiers()?;
        let sql = format!("{} WHERE {} = ?1", self.select_sql(), self.primary_key);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(self.grid_row(row)?),
            None => Err(CrudError::RowNotFound),
        }
    }

    /// Insert a row; returns the new key.
    pub fn add(&self, conn: &Connection, form: &FormValues) -> Result<i64, CrudError> {
        self.check_identifiers()?;
        let values = self.validate(form)?;
        let columns: Vec<&str> = self.fields.iter().map(|f| f.column.as_str()).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        conn.execute(&sql, params_from_iter(values.iter()))?;
        let key = conn.last_insert_rowid();
        tracing::info!(table = %self.table, key, "Row added");
        Ok(key)
    }

    pub fn edit(&self, conn: &Connection, key: i64, form: &FormValues) -> Result<(), CrudError> {
        self.check_identifiers()?;
        let mut values = self.validate(form)?;
        let assignments: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ?{}", f.column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            self.table,
            assignments.join(", "),
            self.primary_key,
            values.len() + 1
        );
        values.push(FieldValue::Integer(key));
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(CrudError::RowNotFound);
        }
        tracing::info!(table = %self.table, key, "Row updated");
        Ok(())
    }

    /// Hard delete.
    pub fn delete(&self, conn: &Connection, key: i64) -> Result<(), CrudError> {
        self.check_identifiers()?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1", self.table, self.primary_key);
        let changed = conn.execute(&sql, [key])?;
        if changed == 0 {
            return Err(CrudError::RowNotFound);
        }
        tracing::info!(table = %self.table, key, "Row deleted");
        Ok(())
    }

    /// Picker entries for a foreign-key field.
    pub fn options(&self, conn: &Connection, column: &str) -> Result<Vec<LookupOption>, CrudError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.column == column)
            .ok_or_else(|| CrudError::Validation(format!("Unknown field: {column}")))?;
        let loader = field
            .loader
            .ok_or_else(|| CrudError::Validation(format!("{} has no options.", field.label)))?;
        Ok(loader(conn)?)
    }
}
