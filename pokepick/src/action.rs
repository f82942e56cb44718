use serde::{Deserialize, Serialize};

use crate::contact::ContactMessage;
use crate::model::{CatalogEntry, CreatureDetail, TeamMember};
use crate::pipeline::WindowBatch;
use crate::state::{FocusArea, InspectDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    EntriesDidLoad(Vec<CatalogEntry>),
    EntriesDidError(String),

    TypesDidLoad(Vec<String>),
    TypesDidError(String),

    UniverseBatchDidLoad { offset: usize, details: Vec<CreatureDetail> },
    UniverseBatchDidError { offset: usize, error: String },

    WindowDidLoad { generation: u64, batch: WindowBatch },
    WindowDidError { generation: u64, error: String },
    Retry,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchDidSettle(String),

    TypeFilterNext,
    TypeFilterPrev,
    TypeFilterClear,
    SortKeyNext,
    SortKeyPrev,
    SortOrderToggle,
    FiltersClear,

    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    ListSelect(usize),

    FocusNext,
    FocusPrev,
    FocusSet(FocusArea),

    InspectOpen,
    InspectClose,
    InspectDidLoad(InspectDetail),
    InspectDidError { id: u32, error: String },

    ComposerCursorMove(i16),
    ComposerSelect(usize),
    ComposerToggleMove,
    ComposerSubmit,

    TeamDidLoad(Vec<TeamMember>),
    TeamDidError(String),
    TeamMemberDidAdd { id: u32, team: Vec<TeamMember> },
    TeamAddDidError { id: u32, error: String },
    TeamSelect(usize),
    TeamSelectionMove(i16),
    TeamRemoveSelected,
    TeamClear,

    InboxOpen,
    InboxClose,
    InboxRefresh,
    InboxSelect(usize),
    InboxSelectionMove(i16),
    InboxMarkRead,
    InboxDelete,
    InboxDidLoad(Vec<ContactMessage>),
    InboxDidError(String),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
