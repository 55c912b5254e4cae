//! Immutable lookup tables built from one refresh of both datasets

use crate::core::{normalize_name, CardId};
use crate::directory::flags::TypeFlags;
use crate::directory::record::{CardRecord, Dataset, Scope};
use crate::{DeckError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Id and name indexes over one dataset
#[derive(Debug, Default)]
pub struct DatasetIndex {
    by_id: FxHashMap<u32, Arc<CardRecord>>,
    by_name: FxHashMap<String, Arc<CardRecord>>,
    by_normalized_name: FxHashMap<String, Arc<CardRecord>>,
}

impl DatasetIndex {
    /// Index a dataset's rows; a later row replaces an earlier one with the
    /// same id or name
    pub fn build(records: Vec<CardRecord>) -> Self {
        let mut index = DatasetIndex {
            by_id: FxHashMap::with_capacity_and_hasher(records.len(), Default::default()),
            by_name: FxHashMap::with_capacity_and_hasher(records.len(), Default::default()),
            by_normalized_name: FxHashMap::default(),
        };
        for record in records {
            let record = Arc::new(record);
            index.by_id.insert(record.id, Arc::clone(&record));
            index
                .by_normalized_name
                .insert(record.name.normalized(), Arc::clone(&record));
            index
                .by_name
                .insert(record.name.as_str().to_string(), record);
        }
        index
    }

    pub fn by_id(&self, id: u32) -> Option<&Arc<CardRecord>> {
        self.by_id.get(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<CardRecord>> {
        self.by_name.get(name)
    }

    fn by_normalized_name(&self, key: &str) -> Option<&Arc<CardRecord>> {
        self.by_normalized_name.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &Arc<CardRecord>> {
        self.by_id.values()
    }
}

/// Both dataset indexes as of one refresh
///
/// Never mutated after construction; the directory swaps in a whole new
/// snapshot on refresh.
#[derive(Debug)]
pub struct DirectorySnapshot {
    ignis: DatasetIndex,
    omega: DatasetIndex,
    built_at: SystemTime,
}

impl DirectorySnapshot {
    pub fn new(ignis: Vec<CardRecord>, omega: Vec<CardRecord>) -> Self {
        DirectorySnapshot {
            ignis: DatasetIndex::build(ignis),
            omega: DatasetIndex::build(omega),
            built_at: SystemTime::now(),
        }
    }

    /// A snapshot with no cards, used before the first refresh
    pub fn empty() -> Self {
        DirectorySnapshot::new(Vec::new(), Vec::new())
    }

    pub fn dataset(&self, dataset: Dataset) -> &DatasetIndex {
        match dataset {
            Dataset::Ignis => &self.ignis,
            Dataset::Omega => &self.omega,
        }
    }

    pub fn built_at(&self) -> SystemTime {
        self.built_at
    }

    /// Total records across both datasets
    pub fn len(&self) -> usize {
        self.ignis.len() + self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ignis.is_empty() && self.omega.is_empty()
    }

    /// Full record for an id
    pub fn record_for_id(&self, id: u32, scope: Scope) -> Result<&Arc<CardRecord>> {
        scope
            .datasets()
            .iter()
            .find_map(|dataset| self.dataset(*dataset).by_id(id))
            .ok_or_else(|| DeckError::NotFound(format!("no card with id {id} in {scope}")))
    }

    /// Full record for a name
    ///
    /// Exact matches are tried in every dataset in scope before falling back
    /// to the ASCII-folded, case-insensitive index.
    pub fn record_for_name(&self, name: &str, scope: Scope) -> Result<&Arc<CardRecord>> {
        let datasets = scope.datasets();
        if let Some(record) = datasets
            .iter()
            .find_map(|dataset| self.dataset(*dataset).by_name(name))
        {
            return Ok(record);
        }

        let key = normalize_name(name);
        datasets
            .iter()
            .find_map(|dataset| self.dataset(*dataset).by_normalized_name(&key))
            .ok_or_else(|| DeckError::NotFound(format!("no card named '{name}' in {scope}")))
    }

    pub fn name_for_id(&self, id: u32, scope: Scope) -> Result<&str> {
        Ok(self.record_for_id(id, scope)?.name.as_str())
    }

    pub fn id_for_name(&self, name: &str, scope: Scope) -> Result<u32> {
        Ok(self.record_for_name(name, scope)?.id)
    }

    pub fn type_flags_for_id(&self, id: u32, scope: Scope) -> Result<TypeFlags> {
        Ok(self.record_for_id(id, scope)?.type_flags())
    }

    /// Name for a deck slot; `NaN` slots have no name
    pub fn name_for_card(&self, card: CardId, scope: Scope) -> Result<&str> {
        match card {
            CardId::Known(id) => self.name_for_id(id, scope),
            CardId::NaN => Err(DeckError::NotFound("no card with id NaN".to_string())),
        }
    }
}

impl Default for DirectorySnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
