use crate::model::{CatalogEntry, ExtendedDetail};
use crate::pipeline::BatchShaping;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadEntries,
    LoadTypes,
    LoadTeam,
    LoadUniverseBatch { offset: usize, entries: Vec<CatalogEntry> },
    CancelUniverse,
    FetchWindow { generation: u64, request: WindowRequest },
    CancelWindow,
    DebounceSearch { query: String },
    CancelSearchDebounce,
    LoadInspect { id: u32 },
    SubmitMember { detail: ExtendedDetail, moves: Vec<String> },
    RemoveMember { id: u32 },
    ClearTeam,
    LoadInbox,
    MarkMessageRead { id: i64 },
    DeleteMessage { id: i64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum WindowRequest {
    Page {
        offset: usize,
        shaping: BatchShaping,
    },
    Search {
        candidates: Vec<CatalogEntry>,
        remaining: bool,
        shaping: BatchShaping,
    },
}
