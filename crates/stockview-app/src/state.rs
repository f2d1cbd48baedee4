// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// The search text and stock toggle that drive the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    filter_text: String,
    in_stock_only: bool,
}

impl ViewState {
    pub fn new(filter_text: impl Into<String>, in_stock_only: bool) -> Self {
        Self {
            filter_text: filter_text.into(),
            in_stock_only,
        }
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub const fn in_stock_only(&self) -> bool {
        self.in_stock_only
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    pub fn set_in_stock_only(&mut self, flag: bool) {
        self.in_stock_only = flag;
    }

    pub fn snapshot(&self) -> (String, bool) {
        (self.filter_text.clone(), self.in_stock_only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    StockToggle,
}

impl Focus {
    pub const ALL: [Self; 2] = [Self::Search, Self::StockToggle];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::StockToggle => "in-stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: ViewState,
    pub focus: Focus,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            focus: Focus::Search,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SetFilterText(String),
    PushFilterChar(char),
    PopFilterChar,
    ClearFilter,
    SetInStockOnly(bool),
    ToggleInStockOnly,
    FocusNext,
    FocusPrev,
    SetStatus(String),
    ClearStatus,
}

/// Emitted by [`AppState::dispatch`].
///
/// `ViewChanged` means the listing is stale: callers re-run
/// [`crate::evaluate`] before reading rows again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ViewChanged(ViewState),
    FocusChanged(Focus),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn with_view(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SetFilterText(text) => self.replace_filter(text),
            AppCommand::PushFilterChar(ch) => {
                let mut text = self.view.filter_text().to_owned();
                text.push(ch);
                self.replace_filter(text)
            }
            AppCommand::PopFilterChar => {
                let mut text = self.view.filter_text().to_owned();
                if text.pop().is_none() {
                    return Vec::new();
                }
                self.replace_filter(text)
            }
            AppCommand::ClearFilter => self.replace_filter(String::new()),
            AppCommand::SetInStockOnly(flag) => self.replace_stock_flag(flag),
            AppCommand::ToggleInStockOnly => {
                let flag = !self.view.in_stock_only();
                let mut events = self.replace_stock_flag(flag);
                let label = if flag {
                    "in-stock only"
                } else {
                    "showing all stock"
                };
                events.push(self.set_status(label));
                events
            }
            AppCommand::FocusNext => self.rotate_focus(1),
            AppCommand::FocusPrev => self.rotate_focus(-1),
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn replace_filter(&mut self, text: String) -> Vec<AppEvent> {
        if self.view.filter_text() == text {
            return Vec::new();
        }
        self.view.set_filter_text(text);
        vec![AppEvent::ViewChanged(self.view.clone())]
    }

    fn replace_stock_flag(&mut self, flag: bool) -> Vec<AppEvent> {
        if self.view.in_stock_only() == flag {
            return Vec::new();
        }
        self.view.set_in_stock_only(flag);
        vec![AppEvent::ViewChanged(self.view.clone())]
    }

    fn rotate_focus(&mut self, delta: isize) -> Vec<AppEvent> {
        let all = Focus::ALL;
        let current = all
            .iter()
            .position(|focus| *focus == self.focus)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(all.len() as isize) as usize;
        self.focus = all[next];
        vec![AppEvent::FocusChanged(self.focus)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
