//! In-memory grid source.

use std::collections::HashMap;

use ndarray::ArrayD;

use crate::error::{ReaderError, ReaderResult};
use crate::source::RawGridSource;
use crate::variable::{GridVariable, SourceKind};

/// Named arrays held in memory.
///
/// Useful for synthetic grids and for tests; follows the spelling of the
/// given [`SourceKind`].
#[derive(Debug, Clone)]
pub struct MemorySource {
    kind: SourceKind,
    arrays: HashMap<String, ArrayD<f64>>,
}

impl MemorySource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            arrays: HashMap::new(),
        }
    }

    /// Store an array under an exact name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, array: ArrayD<f64>) {
        self.arrays.insert(name.into(), array);
    }

    /// Store a grid variable under this source's native spelling.
    pub fn insert_variable(&mut self, var: GridVariable, array: ArrayD<f64>) {
        self.insert(var.name(self.kind), array);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, array: ArrayD<f64>) -> Self {
        self.insert(name, array);
        self
    }

    /// Builder form of [`insert_variable`](Self::insert_variable).
    pub fn with_variable(mut self, var: GridVariable, array: ArrayD<f64>) -> Self {
        self.insert_variable(var, array);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<ArrayD<f64>> {
        self.arrays.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }
}

impl RawGridSource for MemorySource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn describe(&self) -> String {
        format!("<memory, {} arrays>", self.arrays.len())
    }

    fn has_array(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>> {
        self.arrays
            .get(name)
            .cloned()
            .ok_or_else(|| ReaderError::MissingVariable(name.to_string()))
    }
}
