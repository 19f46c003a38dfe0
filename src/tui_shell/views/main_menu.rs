use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::App;

pub(in crate::tui_shell) fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    let status = if app.loading {
        Span::styled("discovering clusters...", Style::default().fg(Color::Yellow))
    } else if app.discovered {
        Span::styled(
            format!("{} clusters discovered", app.records.len()),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw("")
    };

    let entry = Span::styled(
        "  Clusters  ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let body = Paragraph::new(vec![
        Line::from(entry),
        Line::from(""),
        Line::from(status),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" menu "));

    frame.render_widget(body, rows[1]);
}
