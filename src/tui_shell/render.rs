use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{App, Screen, views};

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    match app.screen {
        Screen::MainMenu => views::main_menu::draw(frame, app, chunks[1]),
        Screen::ClusterList => views::cluster_list::draw(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
    draw_footer(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " clusterdeck",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(stamp) = &app.updated_at {
        spans.push(Span::styled(
            format!("  updated {}", stamp),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(n) = &app.notification {
        let color = if n.is_error { Color::Red } else { Color::Green };
        Line::from(Span::styled(
            format!(" {}", n.text),
            Style::default().fg(color),
        ))
    } else if let Some(err) = &app.error {
        Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.screen {
        Screen::MainMenu => " ↑/↓ select · enter open · ctrl+r refresh · q quit",
        Screen::ClusterList if app.search.active => {
            " type to filter · ↑/↓ move · esc clear · ctrl+c quit"
        }
        Screen::ClusterList => {
            " ↑/↓ move · tab pane · / search · enter copy · ctrl+u refresh one · ctrl+r refresh all · esc back · q quit"
        }
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}
