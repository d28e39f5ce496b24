//! Dashboard info panel component
//!
//! Renders backend and refresh information

use crate::environment::Environment;

use super::super::state::DashboardState;
use super::super::utils::format_count;
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

pub fn render_info_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let mut info_lines = Vec::new();

    // Environment with color coding
    let env_color = match state.environment {
        Environment::Local => Color::Green,
        Environment::Custom { .. } => Color::Yellow,
    };
    info_lines.push(Line::from(vec![Span::styled(
        format!("Env: {}", state.environment),
        Style::default().fg(env_color),
    )]));
    info_lines.push(Line::from(vec![Span::styled(
        format!("API: {}", state.environment.api_url()),
        Style::default().fg(Color::LightBlue),
    )]));

    info_lines.push(Line::from(vec![Span::styled(
        format!(
            "Every {}s, limit {}",
            state.refresh.interval.as_secs(),
            state.refresh.fetch_limit
        ),
        Style::default().fg(Color::Cyan),
    )]));

    let uptime = state.start_time.elapsed();
    let uptime_string = if uptime.as_secs() >= 3600 {
        format!(
            "Uptime: {}h {}m {}s",
            uptime.as_secs() / 3600,
            (uptime.as_secs() % 3600) / 60,
            uptime.as_secs() % 60
        )
    } else {
        format!(
            "Uptime: {}m {}s",
            uptime.as_secs() / 60,
            uptime.as_secs() % 60
        )
    };
    info_lines.push(Line::from(vec![Span::styled(
        uptime_string,
        Style::default().fg(Color::LightGreen),
    )]));

    let last_updated = state
        .view_state()
        .last_updated
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    info_lines.push(Line::from(vec![Span::styled(
        format!("Updated: {}", last_updated),
        Style::default().fg(Color::LightCyan),
    )]));

    let stats = &state.stats;
    info_lines.push(Line::from(vec![
        Span::styled("Cycles: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} ok", format_count(stats.succeeded)),
            Style::default().fg(Color::LightGreen),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{} failed", format_count(stats.failed)),
            Style::default().fg(if stats.failed > 0 {
                Color::LightRed
            } else {
                Color::Gray
            }),
        ),
    ]));

    // Data stays on screen after a failure; flag that it may be stale.
    if stats.last_error.is_some() {
        info_lines.push(Line::from(vec![Span::styled(
            "Showing last good data",
            Style::default().fg(Color::LightYellow),
        )]));
    }

    let info_block = Block::default()
        .title("BACKEND")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let info_paragraph = Paragraph::new(info_lines)
        .block(info_block)
        .wrap(Wrap { trim: true });
    f.render_widget(info_paragraph, area);
}
