//! Summary counters

use super::super::state::DashboardState;
use super::super::utils::format_count;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

pub fn render_counters(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let view = state.view();
    render_counter(f, chunks[0], "Total Ticks", view.ticks_count, Color::LightBlue);
    render_counter(
        f,
        chunks[1],
        "Total Extrinsics",
        view.extrinsics_count,
        Color::LightGreen,
    );
}

fn render_counter(f: &mut Frame, area: Rect, title: &str, value: u64, color: Color) {
    // Keep the number on the middle row of the box.
    let top_pad = area.height.saturating_sub(3) / 2;
    let counter = Paragraph::new(format_count(value))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan))
                .padding(Padding::top(top_pad)),
        );
    f.render_widget(counter, area);
}
