use std::collections::VecDeque;

use crate::analysis::{Mode, PickerKind, Selection};
use crate::dataset::Dataset;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Picker,
}

/// Distinct values offered by the secondary pickers, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerOptions {
    pub players: Vec<String>,
    pub matches: Vec<String>,
    pub teams: Vec<String>,
}

impl PickerOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            players: dataset.players(),
            matches: dataset.match_ids(),
            teams: dataset.teams(),
        }
    }

    pub fn values(&self, kind: PickerKind) -> &[String] {
        match kind {
            PickerKind::Player => &self.players,
            PickerKind::Match => &self.matches,
            PickerKind::Team => &self.teams,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub focus: Focus,
    pub options: PickerOptions,
    pub picker_selected: usize,
    pub table_scroll: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(options: PickerOptions) -> Self {
        Self {
            mode: Mode::PlayerStats,
            focus: Focus::Menu,
            options,
            picker_selected: 0,
            table_scroll: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.picker_selected = 0;
        self.table_scroll = 0;
        if mode.picker().is_none() {
            self.focus = Focus::Menu;
        }
    }

    pub fn next_mode(&mut self) {
        let idx = (self.mode.index() + 1) % Mode::ALL.len();
        self.set_mode(Mode::ALL[idx]);
    }

    pub fn prev_mode(&mut self) {
        let idx = self.mode.index();
        let idx = if idx == 0 { Mode::ALL.len() - 1 } else { idx - 1 };
        self.set_mode(Mode::ALL[idx]);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Menu if self.mode.picker().is_some() => Focus::Picker,
            _ => Focus::Menu,
        };
    }

    pub fn picker_values(&self) -> &[String] {
        match self.mode.picker() {
            Some(kind) => self.options.values(kind),
            None => &[],
        }
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Menu => self.next_mode(),
            Focus::Picker => {
                let total = self.picker_values().len();
                if total == 0 {
                    self.picker_selected = 0;
                    return;
                }
                self.picker_selected = (self.picker_selected + 1) % total;
                self.table_scroll = 0;
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Menu => self.prev_mode(),
            Focus::Picker => {
                let total = self.picker_values().len();
                if total == 0 {
                    self.picker_selected = 0;
                    return;
                }
                if self.picker_selected == 0 {
                    self.picker_selected = total - 1;
                } else {
                    self.picker_selected -= 1;
                }
                self.table_scroll = 0;
            }
        }
    }

    pub fn scroll_table_down(&mut self, total_rows: usize, page: usize) {
        let max_scroll = total_rows.saturating_sub(1);
        self.table_scroll = (self.table_scroll + page.max(1)).min(max_scroll);
    }

    pub fn scroll_table_up(&mut self, page: usize) {
        self.table_scroll = self.table_scroll.saturating_sub(page.max(1));
    }

    /// Swaps in options from a reloaded dataset, keeping the picked value when it survives.
    pub fn replace_options(&mut self, options: PickerOptions) {
        let picked = self.picked_value().map(str::to_string);
        self.options = options;
        let values = self.picker_values();
        self.picker_selected = match picked.and_then(|v| values.iter().position(|x| *x == v)) {
            Some(idx) => idx,
            None => self.picker_selected.min(values.len().saturating_sub(1)),
        };
        self.table_scroll = 0;
    }

    pub fn picked_value(&self) -> Option<&str> {
        self.picker_values()
            .get(self.picker_selected)
            .map(String::as_str)
    }

    /// `None` when the mode needs a picker value and the picker has nothing to offer.
    pub fn selection(&self) -> Option<Selection> {
        match self.mode {
            Mode::PlayerStats => self.picked_value().map(|player| Selection::PlayerStats {
                player: player.to_string(),
            }),
            Mode::MatchStats => self.picked_value().map(|match_id| Selection::MatchStats {
                match_id: match_id.to_string(),
            }),
            Mode::BestBowler => Some(Selection::BestBowler),
            Mode::BestAllRounder => Some(Selection::BestAllRounder),
            Mode::TeamPerformance => self.picked_value().map(|team| Selection::TeamPerformance {
                team: team.to_string(),
            }),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
