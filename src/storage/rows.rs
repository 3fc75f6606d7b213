//! Row-level table operations shared by the local gateways
//!
//! Rows are kept as JSON objects in insertion order, exactly as they would
//! come back from a remote table. Inserting stamps `id` and `created_at`;
//! updating merges the keys of the patch object into the row.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::table::{id_key, Record, Table};
use crate::error::{LedgerError, LedgerResult};

/// The rows of all three tables
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: HashMap<Table, Vec<Value>>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: Table) -> &[Value] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows_mut(&mut self, table: Table) -> &mut Vec<Value> {
        self.tables.entry(table).or_default()
    }

    pub fn replace(&mut self, table: Table, rows: Vec<Value>) {
        self.tables.insert(table, rows);
    }

    pub fn len(&self, table: Table) -> usize {
        self.rows(table).len()
    }
}

fn into_object(value: Value, what: &str) -> LedgerResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(LedgerError::Gateway(format!(
            "{} must serialize to an object, got {}",
            what, other
        ))),
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Build a canonical row from a draft and append it
pub fn insert_row<R: Record>(rows: &mut Vec<Value>, draft: &R::Draft) -> LedgerResult<R> {
    let mut object = into_object(serde_json::to_value(draft)?, "draft")?;
    object.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    object.insert("created_at".into(), serde_json::to_value(Utc::now())?);

    let row = Value::Object(object);
    let record: R = serde_json::from_value(row.clone())?;
    rows.push(row);
    Ok(record)
}

/// Merge a patch into the row with the given id
pub fn update_row<R: Record>(rows: &mut [Value], id: R::Id, patch: &R::Patch) -> LedgerResult<R> {
    let key = id_key(&id)?;
    let patch = into_object(serde_json::to_value(patch)?, "patch")?;

    let row = rows
        .iter_mut()
        .find(|row| row_id(row) == Some(key.as_str()))
        .ok_or_else(|| R::TABLE.not_found(id.to_string()))?;

    let mut merged = row.clone();
    if let Value::Object(object) = &mut merged {
        for (field, value) in patch {
            object.insert(field, value);
        }
    }

    // Validate before committing so a bad patch leaves the row untouched
    let record: R = serde_json::from_value(merged.clone())?;
    *row = merged;
    Ok(record)
}

/// Remove the row with the given id, reporting whether one existed
pub fn delete_row<R: Record>(rows: &mut Vec<Value>, id: R::Id) -> LedgerResult<bool> {
    let key = id_key(&id)?;
    let before = rows.len();
    rows.retain(|row| row_id(row) != Some(key.as_str()));
    Ok(rows.len() != before)
}

/// All rows, newest first
pub fn select_rows<R: Record>(rows: &[Value]) -> LedgerResult<Vec<R>> {
    let mut records = rows
        .iter()
        .rev()
        .map(|row| serde_json::from_value::<R>(row.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
    Ok(records)
}
