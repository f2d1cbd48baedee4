// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use stockview_app::{
    AppCommand, AppEvent, AppState, Catalog, DisplayRow, Focus, RowSummary, evaluate,
};

const PAGE_ROWS: isize = 10;
const SEARCH_PLACEHOLDER: &str = "Search...";
const STOCK_LABEL: &str = "Only show products in stock";
const OUT_OF_STOCK_MARK: &str = "*";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
enum RowProjection {
    Header(String),
    Product {
        name: String,
        price: String,
        stocked: bool,
    },
}

impl RowProjection {
    fn from_row(row: DisplayRow<'_>) -> Self {
        match row {
            DisplayRow::CategoryHeader(category) => Self::Header(category.to_owned()),
            DisplayRow::ProductEntry(product) => Self::Product {
                name: product.name.clone(),
                price: product.price.clone(),
                stocked: product.stocked,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    rows: Vec<RowProjection>,
    summary: RowSummary,
    total_products: usize,
    selected_row: usize,
    status_token: u64,
}

pub fn run_app(state: &mut AppState, catalog: &Catalog) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    refresh_view_data(state, catalog, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, catalog, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn refresh_view_data(state: &AppState, catalog: &Catalog, view_data: &mut ViewData) {
    let rows = evaluate(
        catalog.products(),
        state.view.filter_text(),
        state.view.in_stock_only(),
    );
    view_data.summary = RowSummary::of(&rows);
    view_data.total_products = catalog.len();
    view_data.rows = rows.into_iter().map(RowProjection::from_row).collect();
    clamp_cursor(view_data);
    tracing::debug!(
        filter_text = state.view.filter_text(),
        in_stock_only = state.view.in_stock_only(),
        rows = view_data.rows.len(),
        products = view_data.summary.products,
        "listing refreshed"
    );
}

fn dispatch_and_refresh(
    state: &mut AppState,
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    let mut view_changed = false;
    for event in &events {
        match event {
            AppEvent::ViewChanged(_) => view_changed = true,
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(internal_tx, view_data.status_token);
            }
            AppEvent::FocusChanged(_) | AppEvent::StatusCleared => {}
        }
    }
    if view_changed {
        refresh_view_data(state, catalog, view_data);
    }
}

fn emit_status(
    state: &mut AppState,
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch_and_refresh(
        state,
        catalog,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

/// Applies one key press. Returns `true` when the session should end.
fn handle_key_event(
    state: &mut AppState,
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q' | 'c') if ctrl => return true,
        KeyCode::Char('s') if ctrl => {
            dispatch_and_refresh(
                state,
                catalog,
                view_data,
                internal_tx,
                AppCommand::ToggleInStockOnly,
            );
            return false;
        }
        KeyCode::Char('u') if ctrl => {
            if state.view.filter_text().is_empty() {
                return false;
            }
            dispatch_and_refresh(state, catalog, view_data, internal_tx, AppCommand::ClearFilter);
            emit_status(state, catalog, view_data, internal_tx, "filter cleared");
            return false;
        }
        KeyCode::Tab => {
            dispatch_and_refresh(state, catalog, view_data, internal_tx, AppCommand::FocusNext);
            return false;
        }
        KeyCode::BackTab => {
            dispatch_and_refresh(state, catalog, view_data, internal_tx, AppCommand::FocusPrev);
            return false;
        }
        KeyCode::Up => {
            move_row(view_data, -1);
            return false;
        }
        KeyCode::Down => {
            move_row(view_data, 1);
            return false;
        }
        KeyCode::PageUp => {
            move_row(view_data, -PAGE_ROWS);
            return false;
        }
        KeyCode::PageDown => {
            move_row(view_data, PAGE_ROWS);
            return false;
        }
        KeyCode::Home => {
            view_data.selected_row = 0;
            return false;
        }
        KeyCode::End => {
            view_data.selected_row = view_data.rows.len().saturating_sub(1);
            return false;
        }
        _ => {}
    }

    match state.focus {
        Focus::Search => handle_search_key(state, catalog, view_data, internal_tx, key),
        Focus::StockToggle => {
            handle_toggle_key(state, catalog, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_search_key(
    state: &mut AppState,
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let command = match key.code {
        KeyCode::Esc if state.view.filter_text().is_empty() => return true,
        KeyCode::Esc => AppCommand::ClearFilter,
        KeyCode::Backspace => AppCommand::PopFilterChar,
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            AppCommand::PushFilterChar(ch)
        }
        _ => return false,
    };
    dispatch_and_refresh(state, catalog, view_data, internal_tx, command);
    false
}

fn handle_toggle_key(
    state: &mut AppState,
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => AppCommand::ToggleInStockOnly,
        // Two controls, so stepping back always lands on the search box.
        KeyCode::Esc => AppCommand::FocusPrev,
        _ => return,
    };
    dispatch_and_refresh(state, catalog, view_data, internal_tx, command);
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    if view_data.rows.is_empty() {
        view_data.selected_row = 0;
        return;
    }
    let last = view_data.rows.len() as isize - 1;
    let next = (view_data.selected_row as isize + delta).clamp(0, last);
    view_data.selected_row = next as usize;
}

fn clamp_cursor(view_data: &mut ViewData) {
    view_data.selected_row = view_data
        .selected_row
        .min(view_data.rows.len().saturating_sub(1));
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_search_box(frame, layout[0], state);

    let toggle_style = if state.focus == Focus::StockToggle {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(stock_toggle_text(state)).style(toggle_style),
        layout[1],
    );

    render_table(frame, layout[2], view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);
}

fn render_search_box(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Search;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text_style = if state.view.filter_text().is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_box_text(state)).style(text_style).block(
        Block::default()
            .title("search")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(search, area);

    if focused {
        let typed = state.view.filter_text().chars().count() as u16;
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(["Name", "Price"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows = view_data.rows.iter().map(|row| match row {
        RowProjection::Header(category) => Row::new([
            Cell::from(category.as_str()).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from(""),
        ]),
        RowProjection::Product {
            name,
            price,
            stocked,
        } => {
            let name_style = if *stocked {
                Style::default()
            } else {
                Style::default().fg(Color::Red)
            };
            Row::new([
                Cell::from(format!("  {name}")).style(name_style),
                Cell::from(price.as_str()),
            ])
        }
    });

    let table = Table::new(rows, [Constraint::Min(12), Constraint::Length(10)])
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .block(
            Block::default()
                .title(table_title(view_data))
                .borders(Borders::ALL),
        );

    let mut table_state = TableState::default();
    if !view_data.rows.is_empty() {
        table_state.select(Some(view_data.selected_row));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn search_box_text(state: &AppState) -> String {
    let text = state.view.filter_text();
    if text.is_empty() {
        SEARCH_PLACEHOLDER.to_owned()
    } else {
        text.to_owned()
    }
}

fn stock_toggle_text(state: &AppState) -> String {
    let mark = if state.view.in_stock_only() { "x" } else { " " };
    format!("[{mark}] {STOCK_LABEL}")
}

fn table_title(view_data: &ViewData) -> String {
    if view_data.rows.is_empty() {
        return format!("products (0/{}) no matches", view_data.total_products);
    }
    format!(
        "products ({}/{})",
        view_data.summary.products, view_data.total_products
    )
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let focus = state.focus.label().to_uppercase();
    let hints = match state.focus {
        Focus::Search => "type to filter | esc clear",
        Focus::StockToggle => "space toggle | esc search",
    };
    let default = format!(
        "{hints} | tab focus | ctrl+s stock | up/down pg | ctrl+q | {} categories, {} out of stock shown",
        view_data.summary.headers, view_data.summary.out_of_stock
    );
    match &state.status_line {
        Some(status) => format!("{focus} | {status} | {default}"),
        None => format!("{focus} | {default}"),
    }
}

/// Renders rows as an aligned plain-text table for non-interactive output.
///
/// Products are indented under their category header; out of stock names
/// carry a trailing `*`.
pub fn render_rows_text(rows: &[DisplayRow<'_>]) -> String {
    let product_label = |name: &str, stocked: bool| {
        let mark = if stocked { "" } else { OUT_OF_STOCK_MARK };
        format!("  {name}{mark}")
    };
    let width = rows
        .iter()
        .filter_map(|row| row.product())
        .map(|product| product_label(&product.name, product.stocked).chars().count())
        .fold("Name".len(), usize::max);

    let mut out = format!("{:<width$}  Price\n", "Name");
    if rows.is_empty() {
        out.push_str("(no matching products)\n");
        return out;
    }
    for row in rows {
        match row {
            DisplayRow::CategoryHeader(category) => {
                out.push_str(category);
                out.push('\n');
            }
            DisplayRow::ProductEntry(product) => {
                let label = product_label(&product.name, product.stocked);
                out.push_str(&format!("{label:<width$}  {}\n", product.price));
            }
        }
    }
    out
}
