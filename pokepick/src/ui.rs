use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use pokepick::action::Action;
use pokepick::composer::MOVES_PER_MEMBER;
use pokepick::contact::ContactMessage;
use pokepick::model::{CreatureDetail, StatKey};
use pokepick::normalize::generation_label;
use pokepick::state::{AppState, ComposerState, FocusArea, InboxState};
use pokepick::team::MAX_TEAM_SIZE;

use crate::PickComponentId;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(222, 98, 98);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct PickUi {
    dex_list: SelectList,
    team_list: SelectList,
    move_list: SelectList,
    inbox_list: SelectList,
    status_bar: StatusBar,
}

impl PickUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            team_list: SelectList::new(),
            move_list: SelectList::new(),
            inbox_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PickComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state, event_ctx);
        render_body(
            frame,
            layout[1],
            state,
            event_ctx,
            &mut self.dex_list,
            &mut self.team_list,
        );
        render_footer(frame, layout[2], state, &mut self.status_bar);

        if let Some(composer) = state.composer.as_ref() {
            render_composer(frame, area, state, composer, event_ctx, &mut self.move_list);
        }
        if let Some(inbox) = state.inbox.as_ref() {
            render_inbox(frame, area, inbox, event_ctx, &mut self.inbox_list);
        }
    }

    pub fn handle_header_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Backspace | KeyCode::Delete => vec![Action::TypeFilterClear],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter => vec![Action::InspectOpen],
                KeyCode::PageDown => vec![Action::SelectionPage(1)],
                KeyCode::PageUp => vec![Action::SelectionPage(-1)],
                KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectionJumpTop],
                KeyCode::End | KeyCode::Char('G') => vec![Action::SelectionJumpBottom],
                _ => {
                    let items = dex_items(state);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: dex_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .dex_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_team_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('x') | KeyCode::Delete => vec![Action::TeamRemoveSelected],
                KeyCode::Char('C') => vec![Action::TeamClear],
                _ => {
                    let items = team_items(state);
                    if items.is_empty() {
                        return HandlerResponse::ignored();
                    }
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.team_selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: detail_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: false,
                            wrap_navigation: false,
                        },
                        on_select: Action::TeamSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .team_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::TeamSelectionMove(*delta as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc => vec![Action::SearchCancel],
                KeyCode::Enter => vec![Action::SearchSubmit],
                KeyCode::Backspace => vec![Action::SearchBackspace],
                KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_composer_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(composer) = state.composer.as_ref() else {
            return HandlerResponse::ignored();
        };
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => vec![Action::InspectClose],
                KeyCode::Char(' ') => vec![Action::ComposerToggleMove],
                KeyCode::Char('a') | KeyCode::Enter => vec![Action::ComposerSubmit],
                KeyCode::PageDown => vec![Action::ComposerCursorMove(10)],
                KeyCode::PageUp => vec![Action::ComposerCursorMove(-10)],
                _ => {
                    let items = move_items(composer);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: composer.cursor.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: detail_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ComposerSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .move_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::ComposerCursorMove(*delta as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_inbox_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(inbox) = state.inbox.as_ref() else {
            return HandlerResponse::ignored();
        };
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => vec![Action::InboxClose],
                KeyCode::Enter | KeyCode::Char('m') => vec![Action::InboxMarkRead],
                KeyCode::Delete | KeyCode::Char('d') => vec![Action::InboxDelete],
                KeyCode::Char('r') | KeyCode::Char('R') => vec![Action::InboxRefresh],
                KeyCode::PageDown => vec![Action::InboxSelectionMove(10)],
                KeyCode::PageUp => vec![Action::InboxSelectionMove(-10)],
                _ => {
                    let items = inbox_items(inbox);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: inbox.selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: detail_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::InboxSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .inbox_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::InboxSelectionMove(*delta as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PickComponentId>,
) {
    event_ctx.set_component_area(PickComponentId::Header, area);
    if state.search.active {
        event_ctx.set_component_area(PickComponentId::Search, area);
    }
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let type_filter = state
        .filters
        .selected_type
        .as_deref()
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "ALL".to_string());
    let sort = state
        .filters
        .sort_key
        .map(|key| format!("{} {}", key.label(), state.filters.sort_order.arrow()))
        .unwrap_or_else(|| "#".to_string());
    let search = if state.search.active {
        format!("/{}_", state.search.input)
    } else if state.filters.search_text.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.filters.search_text)
    };
    let total = state
        .universe_total()
        .map(|total| total.to_string())
        .unwrap_or_else(|| "?".to_string());

    let header_text = Text::from(vec![
        Line::from(vec![
            Span::styled(state.mode().label(), title_style),
            Span::raw("  |  Type: "),
            Span::styled(type_filter, Style::default().fg(ACCENT_GOLD)),
            Span::raw("  |  Sort: "),
            Span::styled(sort, Style::default().fg(ACCENT_GOLD)),
            Span::raw("  |  Search: "),
            Span::styled(search, Style::default().fg(ACCENT_TEAL)),
        ]),
        Line::from(vec![
            Span::raw("Shown: "),
            Span::styled(
                format!("{}/{total}", state.window.len()),
                Style::default().fg(ACCENT_TEAL),
            ),
            Span::raw("  |  Team: "),
            Span::styled(
                format!("{}/{MAX_TEAM_SIZE}", state.team.len()),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM))
        .title("POKEPICK");
    let paragraph = Paragraph::new(header_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PickComponentId>,
    dex_list: &mut SelectList,
    team_list: &mut SelectList,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(48), Constraint::Percentage(52)])
        .split(area);
    render_list(frame, layout[0], state, event_ctx, dex_list);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(6)])
        .split(layout[1]);
    render_stats_panel(frame, right[0], state);
    render_team(frame, right[1], state, event_ctx, team_list);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PickComponentId>,
    dex_list: &mut SelectList,
) {
    event_ctx.set_component_area(PickComponentId::List, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::List));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let items = dex_items(state);
    if items.is_empty() {
        let placeholder = if state.window.in_flight || state.is_busy() {
            "Loading..."
        } else if state.window.error.is_some() {
            "Nothing loaded."
        } else {
            "No Pokémon match."
        };
        frame.render_widget(
            Paragraph::new(placeholder)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            layout[0],
        );
    } else {
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.selected_index.min(items.len().saturating_sub(1)),
            is_focused: state.focus == FocusArea::List,
            style: dex_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::ListSelect,
            render_item: &|item| item.clone(),
        };
        dex_list.render(frame, layout[0], props);
    }

    frame.render_widget(Paragraph::new(list_status_line(state)), layout[1]);
}

fn list_status_line(state: &AppState) -> Line<'static> {
    if let Some(label) = state.loading_label() {
        let spinner = SPINNER[(state.tick as usize) % SPINNER.len()];
        return Line::from(Span::styled(
            format!(" {spinner} {label}"),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    if let Some(error) = state.window.error.as_ref().or(state.universe.error.as_ref()) {
        return Line::from(Span::styled(
            format!(" ! {error} (r to retry)"),
            Style::default().fg(ACCENT_RED),
        ));
    }
    let tail = if state.window.has_more {
        "more below"
    } else {
        "end of list"
    };
    Line::from(Span::styled(
        format!(" {} shown, {tail}", state.window.len()),
        Style::default().fg(TEXT_DIM),
    ))
}

fn render_stats_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .selected_creature()
        .map(|creature| format!("#{:03} {}", creature.id, format_name(&creature.name)))
        .unwrap_or_else(|| "STATS".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    frame.render_widget(
        Paragraph::new(detail_stats(state.selected_creature(), state))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn detail_stats(creature: Option<&CreatureDetail>, state: &AppState) -> Text<'static> {
    let Some(creature) = creature else {
        return Text::from("No Pokémon selected.");
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            creature.types.join(" / ").to_ascii_uppercase(),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::styled(
            format!("  total {}", creature.stats.total()),
            Style::default().fg(TEXT_DIM),
        ),
    ])];
    lines.extend(StatKey::ALL.iter().map(|key| {
        let style = if state.filters.sort_key == Some(*key) {
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MAIN)
        };
        Line::from(Span::styled(
            render_stat(*key, creature.stats.get(*key)),
            style,
        ))
    }));
    if state.in_team(creature.id) {
        lines.push(Line::from(Span::styled(
            "On your team",
            Style::default().fg(ACCENT_TEAL),
        )));
    }
    Text::from(lines)
}

fn render_team(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<PickComponentId>,
    team_list: &mut SelectList,
) {
    event_ctx.set_component_area(PickComponentId::Team, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("TEAM {}/{MAX_TEAM_SIZE}", state.team.len()))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Team));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let items = team_items(state);
    if items.is_empty() {
        let text = if state.team_loading {
            "Loading team..."
        } else {
            "No team members yet. Enter on a Pokémon to add it."
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(TEXT_DIM))
                .wrap(Wrap { trim: true }),
            layout[0],
        );
        return;
    }
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.team_selected.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::Team,
        style: detail_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: false,
            wrap_navigation: false,
        },
        on_select: Action::TeamSelect,
        render_item: &|item| item.clone(),
    };
    team_list.render(frame, layout[0], props);

    let moves = state
        .selected_member()
        .map(|member| {
            member
                .moves
                .iter()
                .map(|name| format_name(name))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(moves)
            .style(Style::default().fg(TEXT_DIM))
            .wrap(Wrap { trim: true }),
        layout[1],
    );
}

fn render_composer(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    composer: &ComposerState,
    event_ctx: &mut EventContext<PickComponentId>,
    move_list: &mut SelectList,
) {
    let popup = centered_rect(area, 80, 80);
    event_ctx.set_component_area(PickComponentId::Composer, popup);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("ADD {}", format_name(&composer.name).to_ascii_uppercase()))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(profile_text(state, composer)).wrap(Wrap { trim: true }),
        layout[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(layout[1]);
    let moves_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "MOVES {}/{MOVES_PER_MEMBER}",
            composer.selection.len()
        ))
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    let moves_inner = moves_block.inner(right[0]);
    frame.render_widget(moves_block, right[0]);

    let items = move_items(composer);
    if items.is_empty() {
        let text = if composer.detail.is_loading() {
            "Loading moves..."
        } else {
            "No moves."
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(TEXT_DIM)),
            moves_inner,
        );
    } else {
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: composer.cursor.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: detail_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::ComposerSelect,
            render_item: &|item| item.clone(),
        };
        move_list.render(frame, moves_inner, props);
    }

    let footer = match (&composer.error, composer.submitting) {
        (_, true) => Line::from(Span::styled(
            "Adding to team...",
            Style::default().fg(ACCENT_GOLD),
        )),
        (Some(error), false) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(ACCENT_RED),
        )),
        (None, false) => Line::from(Span::styled(
            "Space toggles a move, a adds to the team, Esc closes.",
            Style::default().fg(TEXT_DIM),
        )),
    };
    frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), right[1]);
}

fn render_inbox(
    frame: &mut Frame,
    area: Rect,
    inbox: &InboxState,
    event_ctx: &mut EventContext<PickComponentId>,
    inbox_list: &mut SelectList,
) {
    let popup = centered_rect(area, 84, 80);
    event_ctx.set_component_area(PickComponentId::Inbox, popup);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "CONTACT MESSAGES  {} total, {} new",
            inbox.messages.len(),
            inbox.unread()
        ))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(rows[0]);

    let items = inbox_items(inbox);
    if items.is_empty() {
        let text = if inbox.loading {
            "Loading messages..."
        } else {
            "No messages yet."
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(TEXT_DIM)),
            columns[0],
        );
    } else {
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: inbox.selected.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: detail_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::InboxSelect,
            render_item: &|item| item.clone(),
        };
        inbox_list.render(frame, columns[0], props);
    }

    frame.render_widget(
        Paragraph::new(message_text(inbox.selected_message()))
            .block(Block::default().borders(Borders::LEFT).border_style(Style::default().fg(TEXT_DIM)))
            .wrap(Wrap { trim: false }),
        columns[1],
    );

    let footer = if let Some(error) = &inbox.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(ACCENT_RED)))
    } else if inbox.pending_delete.is_some() {
        Line::from(Span::styled(
            "Press d again to delete this message.",
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        ))
    } else if inbox.loading {
        Line::from(Span::styled("Syncing inbox...", Style::default().fg(ACCENT_GOLD)))
    } else {
        Line::from(Span::styled(
            "Enter marks read, d deletes, r refreshes, Esc closes.",
            Style::default().fg(TEXT_DIM),
        ))
    };
    frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[1]);
}

fn message_text(message: Option<&ContactMessage>) -> Text<'static> {
    let Some(message) = message else {
        return Text::from(Span::styled(
            "Select a message.",
            Style::default().fg(TEXT_DIM),
        ));
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                message.name.clone(),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  <{}>", message.email), Style::default().fg(TEXT_DIM)),
        ]),
        Line::from(vec![
            Span::styled("Subject: ", Style::default().fg(TEXT_DIM)),
            Span::raw(message.subject.clone()),
        ]),
        Line::from(Span::styled(
            short_timestamp(&message.timestamp),
            Style::default().fg(TEXT_DIM),
        )),
        Line::from(""),
    ];
    lines.extend(message.message.lines().map(|line| Line::from(line.to_string())));
    Text::from(lines)
}

fn profile_text(state: &AppState, composer: &ComposerState) -> Text<'static> {
    if let Some(error) = composer.detail.error() {
        return Text::from(vec![
            Line::from(Span::styled(
                format!("Could not load details: {error}"),
                Style::default().fg(ACCENT_RED),
            )),
            Line::from("Esc to close."),
        ]);
    }
    let Some(inspect) = composer.detail.data() else {
        return Text::from(Span::styled(
            "Loading details...",
            Style::default().fg(TEXT_DIM),
        ));
    };
    let extended = &inspect.extended;
    let detail = &extended.detail;
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{:03} {}", detail.id, format_name(&detail.name)),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                inspect
                    .generation
                    .as_deref()
                    .map(|name| format!("  {}", generation_label(name)))
                    .unwrap_or_default(),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Type    ", label),
            Span::styled(detail.types.join(" / ").to_ascii_uppercase(), value),
        ]),
        Line::from(vec![
            Span::styled("Height  ", label),
            Span::styled(format!("{:.1} m", extended.height as f32 / 10.0), value),
        ]),
        Line::from(vec![
            Span::styled("Weight  ", label),
            Span::styled(format!("{:.1} kg", extended.weight as f32 / 10.0), value),
        ]),
        Line::from(vec![
            Span::styled("Ability ", label),
            Span::styled(
                extended
                    .abilities
                    .iter()
                    .map(|name| format_name(name))
                    .collect::<Vec<_>>()
                    .join(", "),
                value,
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(
        StatKey::ALL
            .iter()
            .map(|key| Line::from(render_stat(*key, detail.stats.get(*key)))),
    );
    if !detail.image_url.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(detail.image_url.clone(), label)));
    }
    if state.in_team(detail.id) {
        lines.push(Line::from(Span::styled(
            "Already on your team.",
            Style::default().fg(ACCENT_GOLD),
        )));
    }
    Text::from(lines)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.team_loading {
            "Syncing team...".to_string()
        } else if state.type_list.is_loading() {
            "Loading types...".to_string()
        } else {
            String::new()
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, Vec::new());
    }
    if state.composer.is_some() {
        let left = vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Space", "Toggle"),
            StatusBarHint::new("a", "Add"),
            StatusBarHint::new("Esc", "Close"),
        ];
        return (left, Vec::new());
    }
    if state.inbox.is_some() {
        let left = vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Mark read"),
            StatusBarHint::new("d d", "Delete"),
            StatusBarHint::new("r", "Refresh"),
            StatusBarHint::new("Esc", "Close"),
        ];
        return (left, Vec::new());
    }

    let left = match state.focus {
        FocusArea::List => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("PgUp/PgDn", "Page"),
            StatusBarHint::new("Enter", "Inspect"),
        ],
        FocusArea::Team => vec![
            StatusBarHint::new("j/k", "Select"),
            StatusBarHint::new("x", "Remove"),
            StatusBarHint::new("C", "Clear"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("[ ]", "Type"),
        StatusBarHint::new("s/S", "Sort"),
        StatusBarHint::new("o", "Order"),
        StatusBarHint::new("c", "Clear"),
        StatusBarHint::new("m", "Inbox"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .window
        .items
        .iter()
        .map(|creature| {
            let marker = if state.in_team(creature.id) { "*" } else { " " };
            let mut spans = vec![
                Span::raw(format!("{marker} #{:03} {:<14}", creature.id, format_name(&creature.name))),
                Span::styled(
                    format!(" {:<16}", creature.types.join("/").to_ascii_uppercase()),
                    Style::default().fg(TEXT_DIM),
                ),
            ];
            if let Some(key) = state.filters.sort_key {
                spans.push(Span::styled(
                    format!(" {} {:>3}", key.short(), creature.stats.get(key)),
                    Style::default().fg(ACCENT_GOLD),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn team_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .team
        .iter()
        .enumerate()
        .map(|(idx, member)| {
            Line::from(format!(
                "{} #{:03} {}",
                idx + 1,
                member.id(),
                format_name(&member.detail.name)
            ))
        })
        .collect()
}

fn inbox_items(inbox: &InboxState) -> Vec<Line<'static>> {
    inbox
        .messages
        .iter()
        .map(|message| {
            let (marker, style) = if message.is_unread() {
                ("NEW", Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("   ", Style::default().fg(TEXT_MAIN))
            };
            Line::from(vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(format!("{:<14} ", message.name), style),
                Span::styled(message.subject.clone(), Style::default().fg(TEXT_DIM)),
            ])
        })
        .collect()
}

/// `2024-05-01T10:00:00.000Z` becomes `2024-05-01 10:00`.
fn short_timestamp(timestamp: &str) -> String {
    timestamp.replacen('T', " ", 1).chars().take(16).collect()
}

fn move_items(composer: &ComposerState) -> Vec<Line<'static>> {
    composer
        .moves()
        .iter()
        .map(|name| {
            let check = if composer.selection.contains(name) {
                "[x]"
            } else {
                "[ ]"
            };
            Line::from(format!("{check} {}", format_name(name)))
        })
        .collect()
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn detail_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL_ALT),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_stat(key: StatKey, value: u8) -> String {
    let bar_len = (value as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", label = key.short())
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}
