//! Dashboard main renderer

use super::components::{charts, counters, footer, header, info_panel, loading, logs, tables};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    if state.is_loading() {
        render_loading_body(f, main_chunks[1], state);
    } else {
        render_body(f, main_chunks[1], state);
    }
    footer::render_footer(f, main_chunks[2]);
}

fn render_loading_body(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(12)])
        .split(area);

    loading::render_loading(f, chunks[0], state);
    render_status_row(f, chunks[1], state);
}

fn render_body(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Fill(1),
        ])
        .split(area);

    counters::render_counters(f, chunks[0], state);
    charts::render_charts(f, chunks[1], state);
    tables::render_tables(f, chunks[2], state);
    render_status_row(f, chunks[3], state);
}

fn render_status_row(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    info_panel::render_info_panel(f, chunks[0], state);
    logs::render_logs_panel(f, chunks[1], state);
}
