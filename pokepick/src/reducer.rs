use tracing::{debug, info};
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::composer::compose;
use crate::effect::{Effect, WindowRequest};
use crate::model::StatKey;
use crate::pipeline::{
    search_candidates, AcquisitionMode, Filters, GlobalView, WindowBatch, UNIVERSE_BATCH,
    WINDOW_BATCH,
};
use crate::state::{AppState, ComposerState, InboxState};

/// Rows left below the selection before the next window is requested.
pub const LOAD_AHEAD: usize = 5;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            state.entries = DataResource::Loading;
            state.type_list = DataResource::Loading;
            state.team_loading = true;
            state.window_key = state.filters.window_key();
            let mut effects = vec![Effect::LoadEntries, Effect::LoadTypes, Effect::LoadTeam];
            effects.extend(request_window(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::EntriesDidLoad(entries) => {
            info!(count = entries.len(), "catalog listing loaded");
            state.entries = DataResource::Loaded(entries);
            DispatchResult::changed_with_many(load_more_if_needed(state))
        }

        Action::EntriesDidError(error) => {
            state.message = Some(format!("Catalog error: {error}. Press r to retry."));
            state.entries = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::TypesDidLoad(types) => {
            state.type_list = DataResource::Loaded(types);
            DispatchResult::changed()
        }

        Action::TypesDidError(error) => {
            state.message = Some(format!("Type error: {error}"));
            state.type_list = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::UniverseBatchDidLoad { offset, details } => {
            let Some(total) = state.universe_total() else {
                return DispatchResult::unchanged();
            };
            if !state.universe.loading || offset != state.universe.next {
                return DispatchResult::unchanged();
            }
            state.universe.details.extend(details);
            state.universe.next = (offset + UNIVERSE_BATCH).min(total);
            if state.universe.next < total {
                let effect = next_universe_batch(state);
                return DispatchResult::changed_with_many(effect.into_iter().collect());
            }
            state.universe.loading = false;
            state.universe.complete = true;
            info!(
                normalized = state.universe.details.len(),
                "creature universe complete"
            );
            DispatchResult::changed_with_many(request_window(state))
        }

        Action::UniverseBatchDidError { offset, error } => {
            if !state.universe.loading || offset != state.universe.next {
                return DispatchResult::unchanged();
            }
            state.universe.loading = false;
            state.message = Some(format!("Could not load all Pokémon: {error}. Press r to retry."));
            state.universe.error = Some(error);
            DispatchResult::changed()
        }

        Action::WindowDidLoad { generation, batch } => {
            if !state.window.append(generation, batch) {
                debug!(generation, current = state.window.generation, "stale window dropped");
                return DispatchResult::unchanged();
            }
            clamp_selection(state);
            DispatchResult::changed_with_many(load_more_if_needed(state))
        }

        Action::WindowDidError { generation, error } => {
            if !state.window.fail(generation, error.clone()) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Could not load Pokémon: {error}. Press r to retry."));
            DispatchResult::changed()
        }

        Action::Retry => {
            let mut effects = Vec::new();
            let mut retried = state.window.clear_error();
            retried |= state.universe.error.take().is_some();
            if state.entries.is_failed() {
                state.entries = DataResource::Empty;
                effects.extend(ensure_entries(state));
                retried = true;
            }
            if state.type_list.is_failed() {
                state.type_list = DataResource::Loading;
                effects.push(Effect::LoadTypes);
                retried = true;
            }
            if !retried {
                return DispatchResult::unchanged();
            }
            state.message = None;
            effects.extend(request_window(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.input = state.filters.search_text.clone();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.input.push(ch);
            DispatchResult::changed_with(Effect::DebounceSearch {
                query: state.search.input.clone(),
            })
        }

        Action::SearchBackspace => {
            if !state.search.active || state.search.input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(Effect::DebounceSearch {
                query: state.search.input.clone(),
            })
        }

        Action::SearchDidSettle(query) => {
            if query != state.search.input {
                return DispatchResult::unchanged();
            }
            apply_search(state, query, Vec::new())
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let query = state.search.input.clone();
            apply_search(state, query, vec![Effect::CancelSearchDebounce])
        }

        Action::SearchCancel => {
            state.search.active = false;
            state.search.input.clear();
            apply_search(state, String::new(), vec![Effect::CancelSearchDebounce])
        }

        Action::TypeFilterNext => cycle_type(state, 1),
        Action::TypeFilterPrev => cycle_type(state, -1),

        Action::TypeFilterClear => {
            if state.filters.selected_type.is_none() {
                return DispatchResult::unchanged();
            }
            state.filters.selected_type = None;
            refresh_window(state, Vec::new())
        }

        Action::SortKeyNext => cycle_sort_key(state, 1),
        Action::SortKeyPrev => cycle_sort_key(state, -1),

        Action::SortOrderToggle => {
            state.filters.sort_order = state.filters.sort_order.toggled();
            refresh_window(state, Vec::new())
        }

        Action::FiltersClear => {
            state.search.active = false;
            state.search.input.clear();
            if state.filters == Filters::default() {
                return DispatchResult::changed();
            }
            state.filters = Filters::default();
            refresh_window(state, vec![Effect::CancelSearchDebounce])
        }

        Action::SelectionMove(delta) => {
            let next = clamp_index(state.selected_index, state.window.len(), delta);
            select_index(state, next)
        }

        Action::SelectionPage(direction) => {
            let page = list_page_size(state) as i16;
            let next = clamp_index(
                state.selected_index,
                state.window.len(),
                direction.saturating_mul(page),
            );
            select_index(state, next)
        }

        Action::SelectionJumpTop => select_index(state, 0),

        Action::SelectionJumpBottom => {
            let last = state.window.len().saturating_sub(1);
            select_index(state, last)
        }

        Action::ListSelect(index) => {
            let bounded = index.min(state.window.len().saturating_sub(1));
            select_index(state, bounded)
        }

        Action::FocusNext => {
            if state.search.active || state.composer.is_some() {
                return DispatchResult::unchanged();
            }
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            if state.search.active || state.composer.is_some() {
                return DispatchResult::unchanged();
            }
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::FocusSet(area) => {
            if state.focus == area || state.search.active {
                return DispatchResult::unchanged();
            }
            state.focus = area;
            DispatchResult::changed()
        }

        Action::InspectOpen => {
            let Some(creature) = state.selected_creature() else {
                return DispatchResult::unchanged();
            };
            let composer = ComposerState::new(creature);
            let id = composer.id;
            state.composer = Some(composer);
            DispatchResult::changed_with(Effect::LoadInspect { id })
        }

        Action::InspectClose => {
            if state.composer.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::InspectDidLoad(inspect) => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            if composer.id != inspect.extended.detail.id {
                return DispatchResult::unchanged();
            }
            composer.detail = DataResource::Loaded(inspect);
            composer.cursor = 0;
            DispatchResult::changed()
        }

        Action::InspectDidError { id, error } => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            if composer.id != id {
                return DispatchResult::unchanged();
            }
            composer.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::ComposerCursorMove(delta) => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            let next = clamp_index(composer.cursor, composer.moves().len(), delta);
            if next == composer.cursor {
                return DispatchResult::unchanged();
            }
            composer.cursor = next;
            DispatchResult::changed()
        }

        Action::ComposerSelect(index) => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            let bounded = index.min(composer.moves().len().saturating_sub(1));
            if bounded == composer.cursor {
                return DispatchResult::unchanged();
            }
            composer.cursor = bounded;
            DispatchResult::changed()
        }

        Action::ComposerToggleMove => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            let Some(name) = composer.cursor_move().cloned() else {
                return DispatchResult::unchanged();
            };
            if !composer.selection.toggle(&name) {
                return DispatchResult::unchanged();
            }
            composer.error = None;
            DispatchResult::changed()
        }

        Action::ComposerSubmit => {
            let Some(composer) = state.composer.as_mut() else {
                return DispatchResult::unchanged();
            };
            if composer.submitting {
                return DispatchResult::unchanged();
            }
            let Some(inspect) = composer.detail.data() else {
                return DispatchResult::unchanged();
            };
            let moves = composer.selection.moves().to_vec();
            if let Err(err) = compose(&inspect.extended, &moves) {
                composer.error = Some(err.to_string());
                return DispatchResult::changed();
            }
            let detail = inspect.extended.clone();
            composer.submitting = true;
            composer.error = None;
            DispatchResult::changed_with(Effect::SubmitMember { detail, moves })
        }

        Action::TeamDidLoad(team) => {
            state.team = team;
            state.team_loading = false;
            state.team_selected = state.team_selected.min(state.team.len().saturating_sub(1));
            DispatchResult::changed()
        }

        Action::TeamMemberDidAdd { id, team } => {
            state.team = team;
            state.team_selected = state.team_selected.min(state.team.len().saturating_sub(1));
            if let Some(member) = state.team.iter().find(|member| member.id() == id) {
                state.message = Some(format!("{} joined the team!", member.detail.name));
            }
            if state
                .composer
                .as_ref()
                .is_some_and(|composer| composer.submitting && composer.id == id)
            {
                state.composer = None;
            }
            DispatchResult::changed()
        }

        Action::TeamAddDidError { id, error } => {
            match state.composer.as_mut() {
                Some(composer) if composer.submitting && composer.id == id => {
                    composer.submitting = false;
                    composer.error = Some(error);
                }
                _ => state.message = Some(format!("Team error: {error}")),
            }
            DispatchResult::changed()
        }

        Action::TeamDidError(error) => {
            state.team_loading = false;
            state.message = Some(format!("Team error: {error}"));
            DispatchResult::changed()
        }

        Action::TeamSelect(index) => {
            let bounded = index.min(state.team.len().saturating_sub(1));
            if bounded == state.team_selected {
                return DispatchResult::unchanged();
            }
            state.team_selected = bounded;
            DispatchResult::changed()
        }

        Action::TeamSelectionMove(delta) => {
            let next = clamp_index(state.team_selected, state.team.len(), delta);
            if next == state.team_selected {
                return DispatchResult::unchanged();
            }
            state.team_selected = next;
            DispatchResult::changed()
        }

        Action::TeamRemoveSelected => {
            if state.team_loading {
                return DispatchResult::unchanged();
            }
            let Some(id) = state.selected_member().map(|member| member.id()) else {
                return DispatchResult::unchanged();
            };
            state.team_loading = true;
            DispatchResult::changed_with(Effect::RemoveMember { id })
        }

        Action::TeamClear => {
            if state.team_loading || state.team.is_empty() {
                return DispatchResult::unchanged();
            }
            state.team_loading = true;
            DispatchResult::changed_with(Effect::ClearTeam)
        }

        Action::InboxOpen => {
            if state.inbox.is_some() || state.composer.is_some() || state.search.active {
                return DispatchResult::unchanged();
            }
            state.inbox = Some(InboxState {
                loading: true,
                ..InboxState::default()
            });
            DispatchResult::changed_with(Effect::LoadInbox)
        }

        Action::InboxClose => {
            if state.inbox.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::InboxRefresh => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            if inbox.loading {
                return DispatchResult::unchanged();
            }
            inbox.loading = true;
            inbox.error = None;
            inbox.pending_delete = None;
            DispatchResult::changed_with(Effect::LoadInbox)
        }

        Action::InboxSelect(index) => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            let bounded = index.min(inbox.messages.len().saturating_sub(1));
            if bounded == inbox.selected {
                return DispatchResult::unchanged();
            }
            inbox.selected = bounded;
            inbox.pending_delete = None;
            DispatchResult::changed()
        }

        Action::InboxSelectionMove(delta) => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            let next = clamp_index(inbox.selected, inbox.messages.len(), delta);
            if next == inbox.selected {
                return DispatchResult::unchanged();
            }
            inbox.selected = next;
            inbox.pending_delete = None;
            DispatchResult::changed()
        }

        Action::InboxMarkRead => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            if inbox.loading {
                return DispatchResult::unchanged();
            }
            let Some(id) = inbox
                .selected_message()
                .filter(|message| message.is_unread())
                .map(|message| message.id)
            else {
                return DispatchResult::unchanged();
            };
            inbox.loading = true;
            inbox.pending_delete = None;
            DispatchResult::changed_with(Effect::MarkMessageRead { id })
        }

        Action::InboxDelete => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            if inbox.loading {
                return DispatchResult::unchanged();
            }
            let Some(id) = inbox.selected_message().map(|message| message.id) else {
                return DispatchResult::unchanged();
            };
            if inbox.pending_delete != Some(id) {
                inbox.pending_delete = Some(id);
                return DispatchResult::changed();
            }
            inbox.pending_delete = None;
            inbox.loading = true;
            DispatchResult::changed_with(Effect::DeleteMessage { id })
        }

        Action::InboxDidLoad(messages) => {
            let Some(inbox) = state.inbox.as_mut() else {
                return DispatchResult::unchanged();
            };
            inbox.messages = messages;
            inbox.loading = false;
            inbox.error = None;
            inbox.selected = inbox.selected.min(inbox.messages.len().saturating_sub(1));
            DispatchResult::changed()
        }

        Action::InboxDidError(error) => {
            match state.inbox.as_mut() {
                Some(inbox) => {
                    inbox.loading = false;
                    inbox.error = Some(error);
                }
                None => state.message = Some(format!("Inbox error: {error}")),
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.is_busy() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn apply_search(state: &mut AppState, query: String, effects: Vec<Effect>) -> DispatchResult<Effect> {
    if query == state.filters.search_text {
        if effects.is_empty() {
            return DispatchResult::changed();
        }
        return DispatchResult::changed_with_many(effects);
    }
    state.filters.search_text = query;
    refresh_window(state, effects)
}

/// Reset the window when the filters now select a different feed.
fn refresh_window(state: &mut AppState, mut effects: Vec<Effect>) -> DispatchResult<Effect> {
    let key = state.filters.window_key();
    if key == state.window_key {
        if effects.is_empty() {
            return DispatchResult::changed();
        }
        return DispatchResult::changed_with_many(effects);
    }
    debug!(?key, "window reset");
    state.window_key = key;
    state.window.reset();
    state.selected_index = 0;
    state.message = None;

    effects.push(Effect::CancelWindow);
    if !state.mode().is_global() && state.universe.loading {
        state.universe.loading = false;
        effects.push(Effect::CancelUniverse);
    }
    effects.extend(request_window(state));
    DispatchResult::changed_with_many(effects)
}

/// Ask for the next window of the active mode, if one is due.
fn request_window(state: &mut AppState) -> Vec<Effect> {
    if !state.window.can_load() {
        return Vec::new();
    }
    match state.mode() {
        AcquisitionMode::DefaultPaginated => {
            state.window.begin();
            vec![Effect::FetchWindow {
                generation: state.window.generation,
                request: WindowRequest::Page {
                    offset: state.window.offset,
                    shaping: state.filters.shaping(),
                },
            }]
        }
        AcquisitionMode::Search => {
            let Some(entries) = state.entries.data() else {
                return ensure_entries(state);
            };
            let candidates = search_candidates(entries, &state.filters.query());
            let start = state.window.offset.min(candidates.len());
            let end = (start + WINDOW_BATCH).min(candidates.len());
            let remaining = end < candidates.len();
            state.window.begin();
            if start == end {
                let generation = state.window.generation;
                state.window.append(generation, WindowBatch::default());
                return Vec::new();
            }
            vec![Effect::FetchWindow {
                generation: state.window.generation,
                request: WindowRequest::Search {
                    candidates: candidates[start..end].to_vec(),
                    remaining,
                    shaping: state.filters.shaping(),
                },
            }]
        }
        AcquisitionMode::GlobalSort | AcquisitionMode::GlobalTypeFilter => {
            if !state.universe.complete {
                let effects = ensure_universe(state);
                if !state.universe.complete {
                    return effects;
                }
            }
            let key = state.filters.global_key();
            let stale = state
                .global_view
                .as_ref()
                .map_or(true, |view| view.key != key);
            if stale {
                state.global_view = Some(GlobalView::build(&state.universe.details, key));
            }
            let batch = state
                .global_view
                .as_ref()
                .map(|view| view.window(state.window.offset))
                .unwrap_or_default();
            let generation = state.window.generation;
            state.window.begin();
            state.window.append(generation, batch);
            clamp_selection(state);
            Vec::new()
        }
    }
}

fn ensure_entries(state: &mut AppState) -> Vec<Effect> {
    if state.entries.is_empty() {
        state.entries = DataResource::Loading;
        return vec![Effect::LoadEntries];
    }
    Vec::new()
}

fn ensure_universe(state: &mut AppState) -> Vec<Effect> {
    if state.universe.complete || state.universe.loading || state.universe.error.is_some() {
        return Vec::new();
    }
    let Some(total) = state.universe_total() else {
        return ensure_entries(state);
    };
    if state.universe.next >= total {
        state.universe.complete = true;
        return Vec::new();
    }
    state.universe.loading = true;
    next_universe_batch(state).into_iter().collect()
}

fn next_universe_batch(state: &AppState) -> Option<Effect> {
    let entries = state.entries.data()?;
    let start = state.universe.next.min(entries.len());
    let end = (start + UNIVERSE_BATCH).min(entries.len());
    Some(Effect::LoadUniverseBatch {
        offset: start,
        entries: entries[start..end].to_vec(),
    })
}

/// Request more rows once the selection is close to the end of the list.
fn load_more_if_needed(state: &mut AppState) -> Vec<Effect> {
    if state.selected_index + LOAD_AHEAD < state.window.len() {
        return Vec::new();
    }
    request_window(state)
}

fn select_index(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let moved = index < state.window.len() && index != state.selected_index;
    if moved {
        state.selected_index = index;
    }
    let effects = load_more_if_needed(state);
    if !moved && effects.is_empty() {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed_with_many(effects)
}

fn clamp_selection(state: &mut AppState) {
    let len = state.window.len();
    if len == 0 {
        state.selected_index = 0;
    } else if state.selected_index >= len {
        state.selected_index = len - 1;
    }
}

fn cycle_type(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let Some(type_list) = state.type_list.data() else {
        return DispatchResult::unchanged();
    };
    if type_list.is_empty() {
        return DispatchResult::unchanged();
    }
    let current = state
        .filters
        .selected_type
        .as_ref()
        .and_then(|name| type_list.iter().position(|t| t == name))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let next = wrap_index(current, type_list.len() + 1, step);
    state.filters.selected_type = next.checked_sub(1).map(|idx| type_list[idx].clone());
    refresh_window(state, Vec::new())
}

fn cycle_sort_key(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let current = state
        .filters
        .sort_key
        .and_then(|key| StatKey::ALL.iter().position(|candidate| *candidate == key))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let next = wrap_index(current, StatKey::ALL.len() + 1, step);
    state.filters.sort_key = next.checked_sub(1).map(|idx| StatKey::ALL[idx]);
    refresh_window(state, Vec::new())
}

fn wrap_index(current: usize, len: usize, step: i16) -> usize {
    let len = len as i64;
    (current as i64 + i64::from(step)).rem_euclid(len) as usize
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let mut next = current as i64 + i64::from(delta);
    if next < 0 {
        next = 0;
    } else if next >= len as i64 {
        next = len as i64 - 1;
    }
    next as usize
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(10).max(5) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogEntry, CreatureDetail, StatSet};
    use crate::pipeline::WindowBatch;

    fn creature(id: u32) -> CreatureDetail {
        CreatureDetail {
            id,
            name: format!("mon-{id}"),
            image_url: String::new(),
            types: vec!["normal".into()],
            stats: StatSet::default(),
        }
    }

    fn batch(ids: std::ops::RangeInclusive<u32>, has_more: bool) -> WindowBatch {
        WindowBatch {
            items: ids.map(creature).collect(),
            consumed: WINDOW_BATCH,
            has_more,
        }
    }

    #[test]
    fn init_requests_first_page() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(state.window.in_flight);
        assert!(result.effects.contains(&Effect::LoadEntries));
        assert!(result.effects.iter().any(|effect| matches!(
            effect,
            Effect::FetchWindow {
                request: WindowRequest::Page { offset: 0, .. },
                ..
            }
        )));
    }

    #[test]
    fn scrolling_near_the_end_requests_next_page() {
        let mut state = AppState::default();
        let _ = reducer(&mut state, Action::Init);
        let generation = state.window.generation;
        let _ = reducer(
            &mut state,
            Action::WindowDidLoad {
                generation,
                batch: batch(1..=20, true),
            },
        );
        assert!(!state.window.in_flight);

        let result = reducer(&mut state, Action::ListSelect(16));
        assert_eq!(state.selected_index, 16);
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::FetchWindow {
                request: WindowRequest::Page { offset: 20, .. },
                ..
            }]
        ));

        let again = reducer(&mut state, Action::SelectionMove(1));
        assert!(again.effects.is_empty(), "in-flight guard");
    }

    #[test]
    fn wrap_index_cycles_both_ways() {
        assert_eq!(wrap_index(0, 7, -1), 6);
        assert_eq!(wrap_index(6, 7, 1), 0);
        assert_eq!(wrap_index(2, 7, 1), 3);
    }

    #[test]
    fn universe_batches_run_in_order() {
        let mut state = AppState::default();
        let entries: Vec<_> = (1..=90)
            .map(|id| CatalogEntry {
                name: format!("mon-{id}"),
                detail_url: format!("mem://{id}"),
            })
            .collect();
        state.entries = DataResource::Loaded(entries);
        state.filters.sort_key = Some(StatKey::Speed);

        let result = refresh_window(&mut state, Vec::new());
        assert!(state.universe.loading);
        assert!(result.effects.iter().any(|effect| matches!(
            effect,
            Effect::LoadUniverseBatch { offset: 0, entries } if entries.len() == UNIVERSE_BATCH
        )));

        let out_of_order = reducer(
            &mut state,
            Action::UniverseBatchDidLoad {
                offset: 40,
                details: Vec::new(),
            },
        );
        assert!(!out_of_order.changed);

        let result = reducer(
            &mut state,
            Action::UniverseBatchDidLoad {
                offset: 0,
                details: (1..=40).map(creature).collect(),
            },
        );
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadUniverseBatch { offset: 40, .. }]
        ));
        let _ = reducer(
            &mut state,
            Action::UniverseBatchDidLoad {
                offset: 40,
                details: (41..=80).map(creature).collect(),
            },
        );
        let _ = reducer(
            &mut state,
            Action::UniverseBatchDidLoad {
                offset: 80,
                details: (81..=90).map(creature).collect(),
            },
        );
        assert!(state.universe.complete);
        assert_eq!(state.window.len(), WINDOW_BATCH);
        assert!(state.window.has_more);
    }
}
