//! Recent ticks and recent extrinsics tables

use super::super::state::DashboardState;
use super::super::utils::{format_amount_staked, format_netuid, format_record_time};
use crate::consts::dash_consts::view::RECENT_ROWS;
use crate::models::{Extrinsic, Tick};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

pub fn render_tables(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let snapshot = &state.view_state().snapshot;
    render_ticks_table(f, chunks[0], &snapshot.ticks);
    render_extrinsics_table(f, chunks[1], &snapshot.extrinsics);
}

fn table_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

fn header_row(titles: [&'static str; 4]) -> Row<'static> {
    Row::new(titles).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Cells of one ticks-table row. Balances are shown exactly as the backend sent them.
pub fn tick_cells(tick: &Tick) -> [String; 4] {
    [
        tick.block_number.to_string(),
        format_record_time(&tick.timestamp),
        tick.balance.total.clone(),
        tick.balance.alpha.clone(),
    ]
}

pub fn extrinsic_cells(extrinsic: &Extrinsic) -> [String; 4] {
    [
        extrinsic.block_number.to_string(),
        extrinsic.call_function.clone().unwrap_or_default(),
        format_netuid(extrinsic.netuid),
        format_amount_staked(extrinsic.amount_staked),
    ]
}

fn render_ticks_table(f: &mut Frame, area: Rect, ticks: &[Tick]) {
    let rows = ticks
        .iter()
        .take(RECENT_ROWS)
        .map(|tick| Row::new(tick_cells(tick).map(Cell::from)));

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(15),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ],
    )
    .header(header_row(["Block", "Time", "Total", "Alpha"]))
    .block(table_block("Recent Ticks"));
    f.render_widget(table, area);
}

fn render_extrinsics_table(f: &mut Frame, area: Rect, extrinsics: &[Extrinsic]) {
    let rows = extrinsics
        .iter()
        .take(RECENT_ROWS)
        .map(|extrinsic| Row::new(extrinsic_cells(extrinsic).map(Cell::from)));

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Fill(1),
        ],
    )
    .header(header_row(["Block", "Function", "Netuid", "Amount"]))
    .block(table_block("Recent Extrinsics"));
    f.render_widget(table, area);
}
