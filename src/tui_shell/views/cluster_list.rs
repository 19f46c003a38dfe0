use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::{ClusterRecord, ClusterStatus};

use super::super::{App, Pane};

// Below this width the detail pane is not worth splitting for.
const SPLIT_MIN_WIDTH: u16 = 80;

pub(in crate::tui_shell) fn draw(frame: &mut Frame, app: &App, area: Rect) {
    if app.loading && app.records.is_empty() {
        let msg = Paragraph::new("Discovering clusters...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" clusters "));
        frame.render_widget(msg, area);
        return;
    }

    if area.width < SPLIT_MIN_WIDTH {
        draw_list(frame, app, area);
        return;
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    draw_list(frame, app, panes[0]);
    draw_detail(frame, app, panes[1]);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = if app.search.active {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1)])
            .split(area)
    };

    if app.search.active {
        let query = Paragraph::new(Line::from(vec![
            Span::styled(" /", Style::default().fg(Color::Yellow)),
            Span::raw(app.search.query.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]));
        frame.render_widget(query, chunks[0]);
    }
    let list_area = *chunks.last().unwrap_or(&area);

    let visible = app.visible_indices();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|&i| row_item(&app.records[i]))
        .collect();

    let border_style = if app.focused == Pane::List {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = format!(" clusters ({}) ", visible.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected.min(visible.len() - 1)));
    }
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn row_item(record: &ClusterRecord) -> ListItem<'static> {
    let (label, color) = match record.status {
        ClusterStatus::Loading => ("loading", Color::Yellow),
        ClusterStatus::Online => ("online", Color::Green),
        ClusterStatus::Offline => ("offline", Color::Red),
        ClusterStatus::Timeout => ("timeout", Color::Red),
    };
    ListItem::new(Line::from(vec![
        Span::raw(format!("{} ", record.name)),
        Span::styled(label, Style::default().fg(color)),
    ]))
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focused == Pane::Detail {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" details ");

    let Some(record) = app.selected_record() else {
        frame.render_widget(
            Paragraph::new("No cluster selected").block(block),
            area,
        );
        return;
    };

    if app.refreshing.as_deref() == Some(record.name.as_str()) {
        frame.render_widget(
            Paragraph::new(format!("Updating {}...", record.name)).block(block),
            area,
        );
        return;
    }

    if !record.accessible {
        let text = match record.status {
            ClusterStatus::Timeout => format!("{} did not answer in time", record.name),
            _ => format!("{} is not accessible", record.name),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Red))).block(block),
            area,
        );
        return;
    }

    let rows = app.detail_rows();
    if rows.is_empty() {
        if let Some((cluster, err)) = &app.detail_error {
            if *cluster == record.name {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("Failed to load {} details: {}", cluster, err),
                        Style::default().fg(Color::Red),
                    ))
                    .block(block),
                    area,
                );
                return;
            }
        }
        frame.render_widget(
            Paragraph::new(format!("Loading {} details...", record.name)).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|(field, value)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", field),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if app.focused == Pane::Detail {
        state.select(Some(app.detail_selected.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
