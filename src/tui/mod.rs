pub mod views;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::models::Record;

/// Interactive dashboard over the loaded dataset. The dataset is read-only;
/// every filter change re-runs the filter stage and all six views.
pub fn run(records: &[Record]) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = views::AppState::new(records);

    loop {
        terminal.draw(|f| views::render(f, &state))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Tab | KeyCode::Right => state.next_tab(),
                    KeyCode::BackTab | KeyCode::Left => state.prev_tab(),
                    KeyCode::Char(c @ '1'..='6') => {
                        state.select_tab(c as usize - '1' as usize)
                    }
                    KeyCode::Char('r') => state.cycle_region(records, 1),
                    KeyCode::Char('R') => state.cycle_region(records, -1),
                    KeyCode::Char('p') => state.cycle_persona(records, 1),
                    KeyCode::Char('P') => state.cycle_persona(records, -1),
                    KeyCode::Char('c') => state.clear_filters(records),
                    _ => {}
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}
