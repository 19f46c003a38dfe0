use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, Pane, Screen};

/// Everything a key press can mean. Routing is a pure function of the key
/// and current state; the side effects all live in `App::handle_action`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Action {
    Noop,
    Quit,
    MenuUp,
    MenuDown,
    MenuSelect,
    Back,
    MoveUp,
    MoveDown,
    ToggleFocus,
    EnterSearch,
    SearchChar(char),
    SearchBackspace,
    FullRefresh,
    SingleRefresh,
    CopySelected,
}

pub(super) fn route(key: KeyEvent, app: &App) -> Action {
    // Ctrl+C quits from anywhere, search mode included.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.screen {
        Screen::MainMenu => route_main_menu(key),
        Screen::ClusterList if app.search.active => route_search(key),
        Screen::ClusterList => route_cluster_list(key, app),
    }
}

fn route_main_menu(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::FullRefresh,
        KeyCode::Up | KeyCode::Char('k') => Action::MenuUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MenuDown,
        KeyCode::Enter => Action::MenuSelect,
        _ => Action::Noop,
    }
}

/// While the search bar is active, printable keys edit the query instead of
/// triggering shortcuts. Arrows still move so the operator can pick a match
/// without leaving search.
fn route_search(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Back,
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::FullRefresh,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::SearchChar(c)
        }
        _ => Action::Noop,
    }
}

fn route_cluster_list(key: KeyEvent, app: &App) -> Action {
    let busy = app.loading;
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::Back,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::FullRefresh,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            // One refresh at a time; a full batch also blocks it.
            if busy || app.refreshing.is_some() {
                Action::Noop
            } else {
                Action::SingleRefresh
            }
        }
        KeyCode::Char('/') if !busy => Action::EnterSearch,
        KeyCode::Tab | KeyCode::BackTab if !busy => Action::ToggleFocus,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter if app.focused == Pane::Detail => Action::CopySelected,
        _ => Action::Noop,
    }
}
