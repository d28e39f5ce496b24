//! Balance line chart and extrinsics-by-function bar chart

use super::super::state::DashboardState;
use super::super::utils::chart_bounds;
use crate::transform::{BalancePoint, FunctionCount};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
    Paragraph,
};

pub fn render_charts(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let view = state.view();
    render_balance_chart(f, chunks[0], &view.balance_series);
    render_function_histogram(f, chunks[1], &view.function_histogram);
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

/// `(x, y)` pairs for one balance line; x is the position in the series.
fn line_points(series: &[BalancePoint], value: fn(&BalancePoint) -> f64) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, value(point)))
        .collect()
}

fn balance_line<'a>(name: &'a str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_balance_chart(f: &mut Frame, area: Rect, series: &[BalancePoint]) {
    let block = chart_block("Balance Over Time");
    if series.is_empty() {
        f.render_widget(Paragraph::new("No ticks yet").block(block), area);
        return;
    }

    let total = line_points(series, |p| p.total);
    let free = line_points(series, |p| p.free);
    let alpha = line_points(series, |p| p.alpha);

    let datasets = vec![
        balance_line("total", Color::LightBlue, &total),
        balance_line("free", Color::LightGreen, &free),
        balance_line("alpha", Color::Yellow, &alpha),
    ];

    let [y_min, y_max] = chart_bounds(series);
    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let x_labels = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => vec![first.time.clone(), last.time.clone()],
        (Some(only), _) => vec![only.time.clone()],
        _ => Vec::new(),
    };
    let y_labels = vec![
        format!("{:.0}", y_min),
        format!("{:.0}", (y_min + y_max) / 2.0),
        format!("{:.0}", y_max),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

fn render_function_histogram(f: &mut Frame, area: Rect, histogram: &[FunctionCount]) {
    let block = chart_block("Extrinsics by Function");
    if histogram.is_empty() {
        f.render_widget(Paragraph::new("No extrinsics yet").block(block), area);
        return;
    }

    let bars: Vec<Bar> = histogram
        .iter()
        .map(|bucket| {
            Bar::default()
                .value(bucket.count as u64)
                .label(Line::from(bucket.name.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::LightGreen))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}
