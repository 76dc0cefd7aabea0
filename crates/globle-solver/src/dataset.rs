//! Read-only country roster for a round

use crate::geometry::Shape;
use crate::{Result, SolverError};
use std::collections::HashMap;

/// A normalized country name and its territory
#[derive(Debug, Clone)]
pub struct CountryEntry {
    pub name: String,
    pub shape: Shape,
}

impl CountryEntry {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// Accessor the selector reads countries through
pub trait CountryDataset {
    /// Every entry, in iteration order
    fn entries(&self) -> &[CountryEntry];

    /// Shape for a normalized name, `NotFound` if absent
    fn lookup(&self, name: &str) -> Result<&Shape> {
        self.entries()
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.shape)
            .ok_or_else(|| SolverError::NotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// In-memory dataset with a name index. At most one entry per name.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: Vec<CountryEntry>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(entries: Vec<CountryEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(SolverError::DuplicateCountry(entry.name.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl CountryDataset for Dataset {
    fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    fn lookup(&self, name: &str) -> Result<&Shape> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i].shape)
            .ok_or_else(|| SolverError::NotFound(name.to_string()))
    }
}
