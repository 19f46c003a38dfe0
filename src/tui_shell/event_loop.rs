use std::io::Stdout;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::{App, UiMsg, render, router};

const TICK: Duration = Duration::from_millis(50);

/// Single-threaded loop: drain pending messages, draw, then wait up to one
/// tick for input. Worker threads never touch state; everything funnels
/// through the channel.
pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &Receiver<UiMsg>,
) -> Result<()> {
    loop {
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        terminal.draw(|frame| render::draw(frame, app)).context("draw frame")?;

        if app.quit {
            return Ok(());
        }

        if event::poll(TICK).context("poll events")? {
            if let Event::Key(key) = event::read().context("read event")? {
                if key.kind == KeyEventKind::Press {
                    let action = router::route(key, app);
                    app.handle_action(action);
                }
            }
        }
    }
}
