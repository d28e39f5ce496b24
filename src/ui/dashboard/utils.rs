//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::consts::dash_consts::view::UNITS_PER_TOKEN;
use crate::events::Worker;
use crate::transform::BalancePoint;
use chrono::{DateTime, Local, Utc};
use ratatui::prelude::Color;
use std::time::Duration;

/// Get a ratatui color for a worker based on its type
pub fn get_worker_color(worker: &Worker) -> Color {
    match worker {
        Worker::Scheduler => Color::Cyan,
        Worker::Fetcher => Color::LightGreen,
        Worker::Store => Color::Yellow,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Shorten transport errors to something that fits on one log line.
///
/// `"Refresh failed: /ticks: Reqwest error: error sending request for url (...)"`
/// becomes `"Refresh failed: /ticks: backend unreachable"`.
pub fn clean_error_message(msg: &str) -> String {
    if let Some(idx) = msg.find("Reqwest error: ") {
        let detail = if msg.contains("timed out") {
            "request timed out"
        } else if msg.contains("error sending request") {
            "backend unreachable"
        } else {
            "network error"
        };
        return format!("{}{}", &msg[..idx], detail);
    }
    msg.to_string()
}

/// `1234567` -> `"1,234,567"`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_netuid(netuid: Option<i64>) -> String {
    netuid.map_or_else(|| "-".to_string(), |n| n.to_string())
}

/// Staked amount in whole tokens with two decimals; `"-"` when absent.
pub fn format_amount_staked(amount: Option<u64>) -> String {
    amount.map_or_else(
        || "-".to_string(),
        |units| format!("{:.2}", units as f64 / UNITS_PER_TOKEN),
    )
}

/// Local wall-clock time of a record, `MM-DD HH:MM:SS`.
pub fn format_record_time(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%m-%d %H:%M:%S")
        .to_string()
}

/// Seconds until the next scheduled refresh and the share of the interval
/// already elapsed, in percent.
///
/// Scheduled refreshes happen at whole multiples of `interval` after the
/// session started.
pub fn refresh_countdown(elapsed: Duration, interval: Duration) -> (u64, u16) {
    let interval_ms = interval.as_millis().max(1);
    let into_period = elapsed.as_millis() % interval_ms;
    let remaining_ms = interval_ms - into_period;
    let remaining_secs = remaining_ms.div_ceil(1000) as u64;
    let percent = (into_period * 100 / interval_ms) as u16;
    (remaining_secs, percent.min(100))
}

/// Y-axis bounds covering every balance line, padded so flat series still
/// render as a visible line.
pub fn chart_bounds(series: &[BalancePoint]) -> [f64; 2] {
    let values = series
        .iter()
        .flat_map(|point| [point.total, point.free, point.alpha]);
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(1.0);
    let lo = if min >= 0.0 {
        (min - pad).max(0.0)
    } else {
        min - pad
    };
    [lo, max + pad]
}
