//! Insertion-ordered feature row
//!
//! A single-row frame keyed by column name. Insertion order is preserved,
//! duplicate column names are rejected at insert time, and reindexing to a
//! declared schema is strict in both directions: a declared column missing
//! from the frame and an undeclared extra are both contract violations.

use std::collections::HashMap;

use crate::errors::{ChurnError, ChurnResult};

#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    names: Vec<String>,
    values: Vec<f64>,
    index: HashMap<String, usize>,
}

impl FeatureFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append a column. Fails on a name collision rather than overwriting,
    /// since a silent overwrite would corrupt the prediction invisibly.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> ChurnResult<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ChurnError::merge_collision(name));
        }
        self.index.insert(name.clone(), self.values.len());
        self.names.push(name);
        self.values.push(value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.values[i])
    }

    /// Overwrite an existing column in place (scaling step). The column
    /// must already exist.
    pub fn set(&mut self, name: &str, value: f64) -> ChurnResult<()> {
        match self.index.get(name) {
            Some(&i) => {
                self.values[i] = value;
                Ok(())
            }
            None => Err(ChurnError::schema_mismatch(format!(
                "cannot scale missing column {name}"
            ))),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Produce the row values in the declared schema order.
    ///
    /// Columns in the schema but absent here mean the artifacts are
    /// mismatched or stale; columns present here but undeclared mean the
    /// same thing from the other side. Neither is ever zero-filled.
    pub fn reindex(&self, schema: &[String]) -> ChurnResult<Vec<f64>> {
        let missing: Vec<&str> = schema
            .iter()
            .filter(|c| !self.index.contains_key(c.as_str()))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ChurnError::schema_mismatch(format!(
                "classifier schema declares columns absent from encoded row: {}",
                missing.join(", ")
            )));
        }

        if self.len() != schema.len() {
            let declared: HashMap<&str, ()> =
                schema.iter().map(|c| (c.as_str(), ())).collect();
            let extras: Vec<&str> = self
                .names
                .iter()
                .filter(|c| !declared.contains_key(c.as_str()))
                .map(|c| c.as_str())
                .collect();
            return Err(ChurnError::schema_mismatch(format!(
                "encoded row carries columns the classifier never declared: {}",
                extras.join(", ")
            )));
        }

        Ok(schema.iter().map(|c| self.values[self.index[c]]).collect())
    }
}
