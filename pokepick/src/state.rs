use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::composer::MoveSelection;
use crate::contact::ContactMessage;
use crate::model::{CatalogEntry, CreatureDetail, ExtendedDetail, TeamMember};
use crate::pipeline::{AcquisitionMode, Filters, GlobalView, ResultWindow, WindowKey};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    /// Raw keystrokes; `Filters::search_text` only changes once this settles.
    pub input: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    List,
    Team,
}

/// Every creature in the catalog, normalized, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniverseCache {
    pub details: Vec<CreatureDetail>,
    /// Index of the next catalog entry to fetch.
    pub next: usize,
    pub loading: bool,
    pub complete: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InspectDetail {
    pub extended: ExtendedDetail,
    pub generation: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComposerState {
    pub id: u32,
    pub name: String,
    pub detail: DataResource<InspectDetail>,
    pub selection: MoveSelection,
    pub cursor: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ComposerState {
    pub fn new(creature: &CreatureDetail) -> Self {
        Self {
            id: creature.id,
            name: creature.name.clone(),
            detail: DataResource::Loading,
            selection: MoveSelection::default(),
            cursor: 0,
            submitting: false,
            error: None,
        }
    }

    pub fn moves(&self) -> &[String] {
        self.detail
            .data()
            .map(|inspect| inspect.extended.moves.as_slice())
            .unwrap_or(&[])
    }

    pub fn cursor_move(&self) -> Option<&String> {
        self.moves().get(self.cursor)
    }
}

/// Admin view over contact form submissions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxState {
    pub messages: Vec<ContactMessage>,
    pub selected: usize,
    /// A load, mark-read or delete is outstanding.
    pub loading: bool,
    pub error: Option<String>,
    /// Message armed by a first delete press; a second press confirms.
    pub pending_delete: Option<i64>,
}

impl InboxState {
    pub fn selected_message(&self) -> Option<&ContactMessage> {
        self.messages.get(self.selected)
    }

    pub fn unread(&self) -> usize {
        self.messages.iter().filter(|message| message.is_unread()).count()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,

    pub filters: Filters,
    pub search: SearchState,
    pub type_list: DataResource<Vec<String>>,

    pub window_key: WindowKey,
    pub window: ResultWindow,
    pub selected_index: usize,

    pub entries: DataResource<Vec<CatalogEntry>>,
    pub universe: UniverseCache,
    pub global_view: Option<GlobalView>,

    pub composer: Option<ComposerState>,
    pub inbox: Option<InboxState>,

    pub team: Vec<TeamMember>,
    pub team_loading: bool,
    pub team_selected: usize,

    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        let filters = Filters::default();
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::List,
            window_key: filters.window_key(),
            filters,
            search: SearchState::default(),
            type_list: DataResource::Empty,
            window: ResultWindow::default(),
            selected_index: 0,
            entries: DataResource::Empty,
            universe: UniverseCache::default(),
            global_view: None,
            composer: None,
            inbox: None,
            team: Vec::new(),
            team_loading: false,
            team_selected: 0,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn mode(&self) -> AcquisitionMode {
        self.filters.mode()
    }

    pub fn selected_creature(&self) -> Option<&CreatureDetail> {
        self.window.items.get(self.selected_index)
    }

    pub fn selected_member(&self) -> Option<&TeamMember> {
        self.team.get(self.team_selected)
    }

    pub fn in_team(&self, id: u32) -> bool {
        self.team.iter().any(|member| member.id() == id)
    }

    pub fn universe_total(&self) -> Option<usize> {
        self.entries.data().map(Vec::len)
    }

    pub fn is_busy(&self) -> bool {
        self.window.in_flight
            || self.universe.loading
            || self.entries.is_loading()
            || self.team_loading
            || self.inbox.as_ref().is_some_and(|inbox| inbox.loading)
            || self
                .composer
                .as_ref()
                .is_some_and(|composer| composer.detail.is_loading() || composer.submitting)
    }

    /// What the list is waiting on, if anything.
    pub fn loading_label(&self) -> Option<String> {
        let mode = self.mode();
        if mode.is_global() && !self.universe.complete {
            if self.entries.is_loading() {
                return Some("Loading the catalog...".to_string());
            }
            if self.universe.loading {
                let total = self.universe_total().unwrap_or(0);
                let verb = match (&self.filters.sort_key, &self.filters.selected_type) {
                    (Some(key), _) => format!("Sorting all {total} Pokémon by {}", key.label()),
                    (None, Some(type_name)) => {
                        format!("Filtering all {total} Pokémon by {type_name} type")
                    }
                    (None, None) => format!("Loading all {total} Pokémon"),
                };
                return Some(format!("{verb}... {}/{total}", self.universe.next));
            }
        }
        if mode == AcquisitionMode::Search && self.entries.is_loading() {
            return Some("Loading the catalog...".to_string());
        }
        if self.window.in_flight {
            return Some(match mode {
                AcquisitionMode::Search => "Searching...".to_string(),
                _ => "Loading Pokémon...".to_string(),
            });
        }
        None
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::List => FocusArea::Team,
            FocusArea::Team => FocusArea::List,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus_next();
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("List")
                .entry("mode", ron_string(&self.mode()))
                .entry("items", ron_string(&self.window.len()))
                .entry("offset", ron_string(&self.window.offset))
                .entry("has_more", ron_string(&self.window.has_more))
                .entry("in_flight", ron_string(&self.window.in_flight))
                .entry("generation", ron_string(&self.window.generation))
                .entry("selected", ron_string(&self.selected_index))
                .entry("error", ron_string(&self.window.error)),
            DebugSection::new("Filters")
                .entry("search", ron_string(&self.filters.search_text))
                .entry("search_input", ron_string(&self.search.input))
                .entry("search_active", ron_string(&self.search.active))
                .entry("type", ron_string(&self.filters.selected_type))
                .entry("sort_key", ron_string(&self.filters.sort_key))
                .entry("sort_order", ron_string(&self.filters.sort_order)),
            DebugSection::new("Universe")
                .entry("entries", ron_string(&self.universe_total()))
                .entry("normalized", ron_string(&self.universe.details.len()))
                .entry("next", ron_string(&self.universe.next))
                .entry("loading", ron_string(&self.universe.loading))
                .entry("complete", ron_string(&self.universe.complete))
                .entry(
                    "view",
                    ron_string(&self.global_view.as_ref().map(|view| view.key.clone())),
                ),
            DebugSection::new("Team")
                .entry(
                    "members",
                    ron_string(
                        &self
                            .team
                            .iter()
                            .map(|member| member.detail.name.clone())
                            .collect::<Vec<_>>(),
                    ),
                )
                .entry("loading", ron_string(&self.team_loading))
                .entry(
                    "composer",
                    ron_string(&self.composer.as_ref().map(|composer| composer.name.clone())),
                )
                .entry("message", ron_string(&self.message)),
            DebugSection::new("Inbox")
                .entry("open", ron_string(&self.inbox.is_some()))
                .entry(
                    "messages",
                    ron_string(&self.inbox.as_ref().map(|inbox| inbox.messages.len())),
                )
                .entry(
                    "pending_delete",
                    ron_string(&self.inbox.as_ref().and_then(|inbox| inbox.pending_delete)),
                ),
        ]
    }
}
