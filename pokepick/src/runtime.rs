//! Effect handling: every effect becomes a keyed tokio task that reports back
//! with an [`Action`].

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;
use tui_dispatch::{EffectContext, TaskKey};

use crate::action::Action;
use crate::api::Catalog;
use crate::composer;
use crate::contact::ContactStore;
use crate::effect::{Effect, WindowRequest};
use crate::model::{CatalogEntry, ExtendedDetail};
use crate::normalize::normalize_extended;
use crate::pipeline::fetch::{default_window, fetch_details, search_window};
use crate::pipeline::SEARCH_DEBOUNCE;
use crate::state::InspectDetail;
use crate::team::TeamStore;

const WINDOW_TASK: &str = "window";
const UNIVERSE_TASK: &str = "universe";
const SEARCH_TASK: &str = "search";
const TEAM_LOAD_TASK: &str = "team_load";
const TEAM_ADD_TASK: &str = "team_add";
const TEAM_REMOVE_TASK: &str = "team_remove";
const TEAM_CLEAR_TASK: &str = "team_clear";
const INBOX_LOAD_TASK: &str = "inbox_load";
const INBOX_WRITE_TASK: &str = "inbox_write";

pub struct EffectRunner {
    catalog: Arc<dyn Catalog>,
    team: Arc<dyn TeamStore>,
    inbox: Arc<dyn ContactStore>,
    window_cancel: Mutex<CancellationToken>,
    universe_cancel: Mutex<CancellationToken>,
}

impl EffectRunner {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        team: Arc<dyn TeamStore>,
        inbox: Arc<dyn ContactStore>,
    ) -> Self {
        Self {
            catalog,
            team,
            inbox,
            window_cancel: Mutex::new(CancellationToken::new()),
            universe_cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            Effect::LoadEntries => {
                let catalog = Arc::clone(&self.catalog);
                ctx.tasks().spawn(TaskKey::new("entries"), async move {
                    match catalog.list_all_entries(&CancellationToken::new()).await {
                        Ok(entries) => Action::EntriesDidLoad(entries),
                        Err(err) => Action::EntriesDidError(err.to_string()),
                    }
                });
            }
            Effect::LoadTypes => {
                let catalog = Arc::clone(&self.catalog);
                ctx.tasks().spawn(TaskKey::new("types"), async move {
                    match catalog.fetch_types(&CancellationToken::new()).await {
                        Ok(types) => Action::TypesDidLoad(types),
                        Err(err) => Action::TypesDidError(err.to_string()),
                    }
                });
            }
            Effect::LoadTeam => {
                let team = Arc::clone(&self.team);
                ctx.tasks().spawn(TaskKey::new(TEAM_LOAD_TASK), async move {
                    match team.team().await {
                        Ok(members) => Action::TeamDidLoad(members),
                        Err(err) => Action::TeamDidError(err.to_string()),
                    }
                });
            }
            Effect::LoadUniverseBatch { offset, entries } => {
                let catalog = Arc::clone(&self.catalog);
                let cancel = current_token(&self.universe_cancel);
                ctx.tasks().spawn(TaskKey::new(UNIVERSE_TASK), async move {
                    load_universe_batch(catalog.as_ref(), offset, entries, cancel).await
                });
            }
            Effect::CancelUniverse => {
                rotate_token(&self.universe_cancel);
                ctx.tasks().cancel(&TaskKey::new(UNIVERSE_TASK));
            }
            Effect::FetchWindow {
                generation,
                request,
            } => {
                let catalog = Arc::clone(&self.catalog);
                let cancel = rotate_token(&self.window_cancel);
                ctx.tasks().spawn(TaskKey::new(WINDOW_TASK), async move {
                    load_window(catalog.as_ref(), generation, request, cancel).await
                });
            }
            Effect::CancelWindow => {
                rotate_token(&self.window_cancel);
                ctx.tasks().cancel(&TaskKey::new(WINDOW_TASK));
            }
            Effect::DebounceSearch { query } => {
                ctx.tasks()
                    .debounce(SEARCH_TASK, SEARCH_DEBOUNCE, async move {
                        Action::SearchDidSettle(query)
                    });
            }
            Effect::CancelSearchDebounce => {
                ctx.tasks().cancel(&TaskKey::new(SEARCH_TASK));
            }
            Effect::LoadInspect { id } => {
                let catalog = Arc::clone(&self.catalog);
                ctx.tasks().spawn(TaskKey::new("inspect"), async move {
                    load_inspect(catalog.as_ref(), id).await
                });
            }
            Effect::SubmitMember { detail, moves } => {
                let team = Arc::clone(&self.team);
                ctx.tasks().spawn(TaskKey::new(TEAM_ADD_TASK), async move {
                    submit_member(team.as_ref(), detail, moves).await
                });
            }
            Effect::RemoveMember { id } => {
                let team = Arc::clone(&self.team);
                ctx.tasks().spawn(TaskKey::new(TEAM_REMOVE_TASK), async move {
                    match team.remove(id).await {
                        Ok(members) => Action::TeamDidLoad(members),
                        Err(err) => Action::TeamDidError(err.to_string()),
                    }
                });
            }
            Effect::ClearTeam => {
                let team = Arc::clone(&self.team);
                ctx.tasks().spawn(TaskKey::new(TEAM_CLEAR_TASK), async move {
                    match team.clear().await {
                        Ok(members) => Action::TeamDidLoad(members),
                        Err(err) => Action::TeamDidError(err.to_string()),
                    }
                });
            }
            Effect::LoadInbox => {
                let inbox = Arc::clone(&self.inbox);
                ctx.tasks().spawn(TaskKey::new(INBOX_LOAD_TASK), async move {
                    inbox_listing(inbox.as_ref()).await
                });
            }
            Effect::MarkMessageRead { id } => {
                let inbox = Arc::clone(&self.inbox);
                ctx.tasks().spawn(TaskKey::new(INBOX_WRITE_TASK), async move {
                    match inbox.mark_read(id).await {
                        Ok(_) => inbox_listing(inbox.as_ref()).await,
                        Err(err) => Action::InboxDidError(err.to_string()),
                    }
                });
            }
            Effect::DeleteMessage { id } => {
                let inbox = Arc::clone(&self.inbox);
                ctx.tasks().spawn(TaskKey::new(INBOX_WRITE_TASK), async move {
                    match inbox.delete(id).await {
                        Ok(()) => inbox_listing(inbox.as_ref()).await,
                        Err(err) => Action::InboxDidError(err.to_string()),
                    }
                });
            }
        }
    }
}

/// Cancel whatever the slot guards and hand out a fresh token.
fn rotate_token(slot: &Mutex<CancellationToken>) -> CancellationToken {
    let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
    current.cancel();
    *current = CancellationToken::new();
    current.clone()
}

fn current_token(slot: &Mutex<CancellationToken>) -> CancellationToken {
    let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if current.is_cancelled() {
        *current = CancellationToken::new();
    }
    current.clone()
}

pub async fn load_window(
    catalog: &dyn Catalog,
    generation: u64,
    request: WindowRequest,
    cancel: CancellationToken,
) -> Action {
    let result = match request {
        WindowRequest::Page { offset, shaping } => {
            default_window(catalog, offset, &shaping, &cancel).await
        }
        WindowRequest::Search {
            candidates,
            remaining,
            shaping,
        } => search_window(catalog, &candidates, remaining, &shaping, &cancel).await,
    };
    match result {
        Ok(batch) => Action::WindowDidLoad { generation, batch },
        Err(err) => {
            debug!(generation, error = %err, "window failed");
            Action::WindowDidError {
                generation,
                error: err.to_string(),
            }
        }
    }
}

pub async fn load_universe_batch(
    catalog: &dyn Catalog,
    offset: usize,
    entries: Vec<CatalogEntry>,
    cancel: CancellationToken,
) -> Action {
    match fetch_details(catalog, &entries, &cancel).await {
        Ok(details) => Action::UniverseBatchDidLoad { offset, details },
        Err(err) => Action::UniverseBatchDidError {
            offset,
            error: err.to_string(),
        },
    }
}

/// Extended detail plus the species generation. A missing species record
/// only costs the generation label.
pub async fn load_inspect(catalog: &dyn Catalog, id: u32) -> Action {
    let cancel = CancellationToken::new();
    let raw = match catalog.fetch_detail(&catalog.detail_url(id), &cancel).await {
        Ok(raw) => raw,
        Err(err) => {
            return Action::InspectDidError {
                id,
                error: err.to_string(),
            }
        }
    };
    let extended = match normalize_extended(&raw) {
        Ok(extended) => extended,
        Err(err) => {
            return Action::InspectDidError {
                id,
                error: err.to_string(),
            }
        }
    };
    let generation = match &extended.species_url {
        Some(url) => catalog
            .fetch_species_generation(url, &cancel)
            .await
            .ok()
            .flatten(),
        None => None,
    };
    Action::InspectDidLoad(InspectDetail {
        extended,
        generation,
    })
}

/// The inbox as it stands; every write is followed by a fresh listing.
pub async fn inbox_listing(inbox: &dyn ContactStore) -> Action {
    match inbox.messages().await {
        Ok(messages) => Action::InboxDidLoad(messages),
        Err(err) => Action::InboxDidError(err.to_string()),
    }
}

pub async fn submit_member(
    team: &dyn TeamStore,
    detail: ExtendedDetail,
    moves: Vec<String>,
) -> Action {
    let id = detail.detail.id;
    match composer::submit(team, &detail, &moves).await {
        Ok(team) => Action::TeamMemberDidAdd { id, team },
        Err(err) => Action::TeamAddDidError {
            id,
            error: err.to_string(),
        },
    }
}
