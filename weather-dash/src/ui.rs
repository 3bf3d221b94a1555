use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph,
};

use crate::app::Dashboard;

/// Render one frame of the dashboard.
pub fn draw(frame: &mut Frame, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // city input
            Constraint::Length(4), // text summary
            Constraint::Min(10),   // chart
            Constraint::Length(1), // status line
            Constraint::Length(1), // key help
        ])
        .split(frame.area());

    draw_input(frame, chunks[0], dashboard);
    draw_summary(frame, chunks[1], dashboard);
    draw_chart(frame, chunks[2], dashboard);
    draw_status(frame, chunks[3], dashboard);
    draw_help(frame, chunks[4]);

    if let Some(favorites) = &dashboard.favorites {
        draw_favorites_popup(frame, favorites);
    }
}

fn draw_input(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let input = Paragraph::new(dashboard.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("City"));
    frame.render_widget(input, area);

    let cursor_x = area.x.saturating_add(1).saturating_add(cursor_offset(&dashboard.input));
    frame.set_cursor_position(Position::new(cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn draw_summary(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let lines: Vec<Line> = dashboard.summary.iter().map(|line| Line::raw(line.as_str())).collect();
    let summary =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Current"));
    frame.render_widget(summary, area);
}

fn draw_chart(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let days = &dashboard.chart.days;
    let title = format!("5-Day Forecast for {}", dashboard.chart.title);

    if days.is_empty() {
        frame.render_widget(Block::default().borders(Borders::ALL).title(title), area);
        return;
    }

    let min_points: Vec<(f64, f64)> =
        days.iter().enumerate().map(|(i, day)| (i as f64, day.temp_min)).collect();
    let max_points: Vec<(f64, f64)> =
        days.iter().enumerate().map(|(i, day)| (i as f64, day.temp_max)).collect();

    // Pad the vertical bounds so markers don't sit on the frame.
    let y_low = days.iter().map(|day| day.temp_min).fold(f64::INFINITY, f64::min).floor() - 2.0;
    let y_high =
        days.iter().map(|day| day.temp_max).fold(f64::NEG_INFINITY, f64::max).ceil() + 2.0;

    let symbol = dashboard.units.symbol();
    let datasets = vec![
        Dataset::default()
            .name(format!("Min Temp ({symbol})"))
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&min_points),
        Dataset::default()
            .name(format!("Max Temp ({symbol})"))
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&max_points),
    ];

    let x_labels: Vec<Span> = days.iter().map(|day| Span::raw(date_label(day.date))).collect();
    let y_labels: Vec<Span> = vec![
        Span::raw(format!("{y_low:.0}")),
        Span::raw(format!("{:.0}", (y_low + y_high) / 2.0)),
        Span::raw(format!("{y_high:.0}")),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Date")
                .bounds([0.0, days.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(format!("Temperature ({symbol})"))
                .bounds([y_low, y_high])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn draw_status(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let status = Paragraph::new(dashboard.status.as_str())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "Enter search | Ctrl-A add favorite | Ctrl-L list favorites | Ctrl-R remove favorite | Esc quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

fn draw_favorites_popup(frame: &mut Frame, favorites: &[String]) {
    let area = centered_rect(40, 50, frame.area());
    let items: Vec<ListItem> = favorites.iter().map(|name| ListItem::new(name.as_str())).collect();
    let list = List::new(items).block(
        Block::default().borders(Borders::ALL).title("Favorites (press any key to close)"),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

fn date_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Cursor column for the typed input, saturating instead of wrapping for
/// absurdly long input.
fn cursor_offset(input: &str) -> u16 {
    u16::try_from(input.chars().count()).unwrap_or(u16::MAX)
}

/// Centered `percent_x` by `percent_y` sub-rectangle of `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_offset_counts_chars_and_saturates() {
        assert_eq!(cursor_offset(""), 0);
        assert_eq!(cursor_offset("Київ"), 4);
        assert_eq!(cursor_offset(&"x".repeat(70_000)), u16::MAX);
    }
}
