mod ui;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tui_dispatch::{
    EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind, EventRoutingState,
    HandlerResponse, Keybindings,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokepick::action::Action;
use pokepick::api::catalog_for;
use pokepick::config::{ConfigArgs, RuntimeConfig};
use pokepick::contact::inbox_for;
use pokepick::effect::Effect;
use pokepick::logging::init_file_logging;
use pokepick::reducer::reducer;
use pokepick::runtime::EffectRunner;
use pokepick::state::{AppState, FocusArea};
use pokepick::team::store_for;

#[derive(Parser, Debug)]
#[command(name = "pokepick")]
#[command(about = "Browse the Pokédex and build a team of six")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PickComponentId {
    Header,
    List,
    Team,
    Search,
    Composer,
    Inbox,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PickContext {
    Header,
    List,
    Team,
    Search,
    Composer,
    Inbox,
}

impl EventRoutingState<PickComponentId, PickContext> for AppState {
    fn focused(&self) -> Option<PickComponentId> {
        if let Some(id) = self.modal() {
            return Some(id);
        }
        match self.focus {
            FocusArea::List => Some(PickComponentId::List),
            FocusArea::Team => Some(PickComponentId::Team),
        }
    }

    fn modal(&self) -> Option<PickComponentId> {
        if self.search.active {
            Some(PickComponentId::Search)
        } else if self.composer.is_some() {
            Some(PickComponentId::Composer)
        } else if self.inbox.is_some() {
            Some(PickComponentId::Inbox)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PickComponentId) -> PickContext {
        match id {
            PickComponentId::Header => PickContext::Header,
            PickComponentId::List => PickContext::List,
            PickComponentId::Team => PickContext::Team,
            PickComponentId::Search => PickContext::Search,
            PickComponentId::Composer => PickContext::Composer,
            PickComponentId::Inbox => PickContext::Inbox,
        }
    }

    fn default_context(&self) -> PickContext {
        PickContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = RuntimeConfig::from_args(args.config);
    init_file_logging(&config.log_file)?;
    info!(api = %config.api_base, backend = %config.backend_url, "pokepick starting");

    let debug = DebugSession::new(args.debug);
    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let runner = Arc::new(EffectRunner::new(
        catalog_for(&config),
        store_for(&config),
        inbox_for(&config),
    ));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, runner).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    info!("pokepick stopped");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    runner: Arc<EffectRunner>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::PickUi::new()));
    let mut bus: EventBus<AppState, Action, PickComponentId, PickContext> = EventBus::new();
    let keybindings: Keybindings<PickContext> = Keybindings::new();

    let ui_header = Rc::clone(&ui);
    bus.register(PickComponentId::Header, move |event, state| {
        ui_header
            .borrow_mut()
            .handle_header_event(&event.kind, state)
    });

    let ui_list = Rc::clone(&ui);
    bus.register(PickComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_team = Rc::clone(&ui);
    bus.register(PickComponentId::Team, move |event, state| {
        ui_team.borrow_mut().handle_team_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PickComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_composer = Rc::clone(&ui);
    bus.register(PickComponentId::Composer, move |event, state| {
        ui_composer
            .borrow_mut()
            .handle_composer_event(&event.kind, state)
    });

    let ui_inbox = Rc::clone(&ui);
    bus.register(PickComponentId::Inbox, move |event, state| {
        ui_inbox.borrow_mut().handle_inbox_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(_)
            if state.search.active || state.composer.is_some() || state.inbox.is_some() =>
        {
            HandlerResponse::ignored()
        }
        EventKind::Key(key) => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            KeyCode::Char('/') => HandlerResponse::action(Action::SearchStart),
            KeyCode::Char('[') => HandlerResponse::action(Action::TypeFilterPrev),
            KeyCode::Char(']') => HandlerResponse::action(Action::TypeFilterNext),
            KeyCode::Char('s') => HandlerResponse::action(Action::SortKeyNext),
            KeyCode::Char('S') => HandlerResponse::action(Action::SortKeyPrev),
            KeyCode::Char('o') => HandlerResponse::action(Action::SortOrderToggle),
            KeyCode::Char('c') => HandlerResponse::action(Action::FiltersClear),
            KeyCode::Char('r') => HandlerResponse::action(Action::Retry),
            KeyCode::Char('m') => HandlerResponse::action(Action::InboxOpen),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(120), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| runner.handle(effect, ctx),
        )
        .await
}
