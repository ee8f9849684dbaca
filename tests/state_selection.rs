use ipl_terminal::analysis::{Mode, PickerKind, Selection};
use ipl_terminal::state::{AppState, Focus, PickerOptions};

fn options() -> PickerOptions {
    PickerOptions {
        players: vec!["Rohit".to_string(), "Bumrah".to_string(), "Jadeja".to_string()],
        matches: vec!["1".to_string(), "2".to_string()],
        teams: vec!["MI".to_string(), "CSK".to_string()],
    }
}

#[test]
fn menu_lists_modes_in_order() {
    let labels: Vec<&str> = Mode::ALL.iter().map(|m| m.label()).collect();
    assert_eq!(
        labels,
        [
            "Player Stats",
            "Match Stats",
            "Best Bowler",
            "Best All-Rounder",
            "Team Performance"
        ]
    );
    assert_eq!(Mode::PlayerStats.picker(), Some(PickerKind::Player));
    assert_eq!(Mode::MatchStats.picker(), Some(PickerKind::Match));
    assert_eq!(Mode::TeamPerformance.picker(), Some(PickerKind::Team));
    assert_eq!(Mode::BestBowler.picker(), None);
}

#[test]
fn default_selection_is_first_player() {
    let state = AppState::new(options());
    assert_eq!(
        state.selection(),
        Some(Selection::PlayerStats {
            player: "Rohit".to_string()
        })
    );
}

#[test]
fn picker_wraps_in_both_directions() {
    let mut state = AppState::new(options());
    state.toggle_focus();
    assert_eq!(state.focus, Focus::Picker);

    state.select_prev();
    assert_eq!(state.picked_value(), Some("Jadeja"));
    state.select_next();
    assert_eq!(state.picked_value(), Some("Rohit"));
    state.select_next();
    assert_eq!(state.picked_value(), Some("Bumrah"));
}

#[test]
fn changing_mode_resets_picker_and_scroll() {
    let mut state = AppState::new(options());
    state.toggle_focus();
    state.select_next();
    state.scroll_table_down(40, 10);
    assert_eq!(state.table_scroll, 10);

    state.set_mode(Mode::TeamPerformance);
    assert_eq!(state.picker_selected, 0);
    assert_eq!(state.table_scroll, 0);
    assert_eq!(
        state.selection(),
        Some(Selection::TeamPerformance {
            team: "MI".to_string()
        })
    );

    state.set_mode(Mode::BestBowler);
    assert_eq!(state.focus, Focus::Menu);
    assert_eq!(state.selection(), Some(Selection::BestBowler));
}

#[test]
fn menu_focus_cycles_modes() {
    let mut state = AppState::new(options());
    state.select_prev();
    assert_eq!(state.mode, Mode::TeamPerformance);
    state.select_next();
    state.select_next();
    assert_eq!(state.mode, Mode::MatchStats);
    assert_eq!(
        state.selection(),
        Some(Selection::MatchStats {
            match_id: "1".to_string()
        })
    );
}

#[test]
fn focus_stays_on_menu_without_picker() {
    let mut state = AppState::new(options());
    state.set_mode(Mode::BestAllRounder);
    state.toggle_focus();
    assert_eq!(state.focus, Focus::Menu);
}

#[test]
fn empty_picker_yields_no_selection() {
    let mut state = AppState::new(PickerOptions::default());
    assert_eq!(state.selection(), None);
    state.set_mode(Mode::BestBowler);
    assert_eq!(state.selection(), Some(Selection::BestBowler));
}

#[test]
fn table_scroll_is_clamped() {
    let mut state = AppState::new(options());
    state.scroll_table_down(5, 10);
    assert_eq!(state.table_scroll, 4);
    state.scroll_table_up(10);
    assert_eq!(state.table_scroll, 0);
}

#[test]
fn replacing_options_keeps_surviving_pick() {
    let mut state = AppState::new(options());
    state.toggle_focus();
    state.select_next();
    assert_eq!(state.picked_value(), Some("Bumrah"));

    let mut reloaded = options();
    reloaded.players.insert(0, "Kohli".to_string());
    state.replace_options(reloaded);
    assert_eq!(state.picked_value(), Some("Bumrah"));

    state.replace_options(PickerOptions {
        players: vec!["Kohli".to_string()],
        ..options()
    });
    assert_eq!(state.picked_value(), Some("Kohli"));
}

#[test]
fn console_log_is_bounded() {
    let mut state = AppState::new(options());
    for i in 0..250 {
        state.push_log(format!("[INFO] {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] 50"));
}
