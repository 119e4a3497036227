//! Interactive terminal dashboard: a transactions tab with an add/edit form and
//! a dashboard tab with the income/expense pie, the cash flow chart and the balance.

mod render;
mod state;

use cashbook::TransactionStore;
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use state::{AppState, FormField, Mode, Tab};
use std::io;
use std::time::Duration;

/// Runs the dashboard until the user quits. Store errors are shown on screen and
/// never end the loop; only terminal I/O errors are returned.
pub fn run_dashboard(store: &TransactionStore) -> io::Result<()> {
    let today: NaiveDate = Local::now().date_naive();
    let mut state = AppState::new(store, today);

    // Also installs a panic hook that leaves raw mode and the alternate screen.
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, store, &mut state);
    ratatui::restore();

    result
}

fn event_loop(terminal: &mut DefaultTerminal, store: &TransactionStore, state: &mut AppState) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render::draw(frame, state))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(store, state, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Applies one key press. Returns `true` when the user asked to quit.
fn handle_key(store: &TransactionStore, state: &mut AppState, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match state.mode {
        Mode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => state.tab = state.tab.toggle(),
            KeyCode::Char('a') => state.open_add_form(),
            KeyCode::Char('r') => state.reload(store),
            _ if state.tab == Tab::Transactions => match key.code {
                KeyCode::Up => state.move_selection(-1),
                KeyCode::Down => state.move_selection(1),
                KeyCode::PageUp => state.page_up(),
                KeyCode::PageDown => state.page_down(),
                KeyCode::Home => state.select_first(),
                KeyCode::End => state.select_last(),
                KeyCode::Char('e') | KeyCode::Enter => state.open_edit_form(store),
                KeyCode::Char('d') | KeyCode::Delete => state.request_delete(),
                _ => {}
            },
            _ => {}
        },
        Mode::Form => {
            // Ctrl+C / Ctrl+Q cancel the form
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                state.cancel_form();
                return false;
            }

            match key.code {
                KeyCode::Esc => state.cancel_form(),
                KeyCode::Enter => state.submit_form(store),
                KeyCode::Tab | KeyCode::Down => state.form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => state.form.focus_previous(),
                KeyCode::Left | KeyCode::Right if state.form.focus == FormField::Type => {
                    state.form.toggle_type()
                }
                KeyCode::Backspace => state.form.pop_char(),
                KeyCode::Char(ch) => state.form.push_char(ch),
                _ => {}
            }
        }
        Mode::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => state.confirm_delete(store),
            KeyCode::Char('n') | KeyCode::Esc => state.cancel_delete(),
            _ => {}
        },
    }

    false
}
