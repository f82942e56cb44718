//! The list pipeline.
//!
//! Four acquisition modes feed a single [`ResultWindow`]:
//!
//! | mode               | source                              | shaping           |
//! |--------------------|-------------------------------------|-------------------|
//! | `Search`           | universe listing, name substring    | per batch         |
//! | `GlobalSort`       | normalized universe                 | whole sequence    |
//! | `GlobalTypeFilter` | normalized universe                 | whole sequence    |
//! | `DefaultPaginated` | `/pokemon?limit&offset`             | per batch         |
//!
//! Everything here is synchronous. The network half lives in [`fetch`].

pub mod fetch;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{CatalogEntry, CreatureDetail, SortOrder, StatKey};

pub const SEARCH_MIN_CHARS: usize = 2;
pub const SEARCH_CANDIDATE_CAP: usize = 20;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
pub const WINDOW_BATCH: usize = 20;
pub const UNIVERSE_BATCH: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcquisitionMode {
    Search,
    GlobalSort,
    GlobalTypeFilter,
    DefaultPaginated,
}

impl AcquisitionMode {
    pub fn is_global(self) -> bool {
        matches!(
            self,
            AcquisitionMode::GlobalSort | AcquisitionMode::GlobalTypeFilter
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AcquisitionMode::Search => "SEARCH",
            AcquisitionMode::GlobalSort => "SORTED",
            AcquisitionMode::GlobalTypeFilter => "TYPE",
            AcquisitionMode::DefaultPaginated => "BROWSE",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub search_text: String,
    pub selected_type: Option<String>,
    pub sort_key: Option<StatKey>,
    pub sort_order: SortOrder,
}

impl Filters {
    pub fn query(&self) -> String {
        self.search_text.trim().to_lowercase()
    }

    /// Search > GlobalSort > GlobalTypeFilter > DefaultPaginated.
    pub fn mode(&self) -> AcquisitionMode {
        if self.query().chars().count() >= SEARCH_MIN_CHARS {
            AcquisitionMode::Search
        } else if self.sort_key.is_some() {
            AcquisitionMode::GlobalSort
        } else if self.selected_type.is_some() {
            AcquisitionMode::GlobalTypeFilter
        } else {
            AcquisitionMode::DefaultPaginated
        }
    }

    pub fn sort(&self) -> Option<(StatKey, SortOrder)> {
        self.sort_key.map(|key| (key, self.sort_order))
    }

    pub fn shaping(&self) -> BatchShaping {
        BatchShaping {
            type_filter: self.selected_type.clone(),
            sort: self.sort(),
        }
    }

    pub fn global_key(&self) -> GlobalKey {
        GlobalKey {
            sort: self.sort(),
            type_filter: self.selected_type.clone(),
        }
    }

    /// Everything the current window depends on. A change means reset.
    pub fn window_key(&self) -> WindowKey {
        let mode = self.mode();
        WindowKey {
            mode,
            query: if mode == AcquisitionMode::Search {
                self.query()
            } else {
                String::new()
            },
            type_filter: self.selected_type.clone(),
            sort: self.sort(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowKey {
    pub mode: AcquisitionMode,
    pub query: String,
    pub type_filter: Option<String>,
    pub sort: Option<(StatKey, SortOrder)>,
}

/// Filter then stable-sort a single fetched batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchShaping {
    pub type_filter: Option<String>,
    pub sort: Option<(StatKey, SortOrder)>,
}

impl BatchShaping {
    pub fn apply(&self, items: Vec<CreatureDetail>) -> Vec<CreatureDetail> {
        let mut items = filter_by_type(items, self.type_filter.as_deref());
        if let Some((key, order)) = self.sort {
            sort_by_stat(&mut items, key, order);
        }
        items
    }
}

pub fn filter_by_type(items: Vec<CreatureDetail>, type_filter: Option<&str>) -> Vec<CreatureDetail> {
    match type_filter {
        Some(type_name) => items
            .into_iter()
            .filter(|item| item.has_type(type_name))
            .collect(),
        None => items,
    }
}

/// Stable: ties keep their incoming relative order in both directions.
pub fn sort_by_stat(items: &mut [CreatureDetail], key: StatKey, order: SortOrder) {
    match order {
        SortOrder::Ascending => items.sort_by(|a, b| a.stats.get(key).cmp(&b.stats.get(key))),
        SortOrder::Descending => items.sort_by(|a, b| b.stats.get(key).cmp(&a.stats.get(key))),
    }
}

/// Case-insensitive substring match on names, capped.
pub fn search_candidates(entries: &[CatalogEntry], query: &str) -> Vec<CatalogEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&query))
        .take(SEARCH_CANDIDATE_CAP)
        .cloned()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalKey {
    pub sort: Option<(StatKey, SortOrder)>,
    pub type_filter: Option<String>,
}

/// Sorted and/or filtered copy of the universe for the global modes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalView {
    pub key: GlobalKey,
    pub items: Vec<CreatureDetail>,
}

impl GlobalView {
    /// Sorting happens first; a type filter then keeps the sorted order.
    pub fn build(universe: &[CreatureDetail], key: GlobalKey) -> Self {
        let mut items = universe.to_vec();
        if let Some((stat, order)) = key.sort {
            sort_by_stat(&mut items, stat, order);
        }
        let items = filter_by_type(items, key.type_filter.as_deref());
        Self { key, items }
    }

    pub fn window(&self, offset: usize) -> WindowBatch {
        let start = offset.min(self.items.len());
        let end = (start + WINDOW_BATCH).min(self.items.len());
        WindowBatch {
            items: self.items[start..end].to_vec(),
            consumed: end - start,
            has_more: end < self.items.len(),
        }
    }
}

/// One fetched slice, ready to append.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBatch {
    pub items: Vec<CreatureDetail>,
    /// How far the cursor moves once this batch is applied.
    pub consumed: usize,
    pub has_more: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultWindow {
    pub items: Vec<CreatureDetail>,
    seen: HashSet<u32>,
    pub offset: usize,
    pub has_more: bool,
    pub in_flight: bool,
    pub generation: u64,
    pub error: Option<String>,
}

impl Default for ResultWindow {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            offset: 0,
            has_more: true,
            in_flight: false,
            generation: 0,
            error: None,
        }
    }
}

impl ResultWindow {
    /// Drop everything and start a new generation. Returns it.
    pub fn reset(&mut self) -> u64 {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
        generation
    }

    pub fn can_load(&self) -> bool {
        self.has_more && !self.in_flight && self.error.is_none()
    }

    /// Mark a window request as outstanding. `false` means nothing to do.
    pub fn begin(&mut self) -> bool {
        if !self.can_load() {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Apply a batch for `generation`. Stale batches are ignored.
    pub fn append(&mut self, generation: u64, batch: WindowBatch) -> bool {
        if generation != self.generation || !self.in_flight {
            return false;
        }
        for item in batch.items {
            if self.seen.insert(item.id) {
                self.items.push(item);
            }
        }
        self.offset += batch.consumed;
        self.has_more = batch.has_more;
        self.in_flight = false;
        self.error = None;
        true
    }

    pub fn fail(&mut self, generation: u64, error: String) -> bool {
        if generation != self.generation || !self.in_flight {
            return false;
        }
        self.in_flight = false;
        self.error = Some(error);
        true
    }

    pub fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
