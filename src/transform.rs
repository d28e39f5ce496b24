//! Snapshot-to-chart derivations.
//!
//! Both derivations are pure and are recomputed from the current snapshot
//! on every read. Nothing here mutates the snapshot.

use crate::consts::dash_consts::view::{BALANCE_SERIES_LEN, UNKNOWN_FUNCTION};
use crate::models::{Snapshot, Tick};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;

/// One point of the balance line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    /// Local wall-clock time of the tick, `HH:MM:SS`.
    pub time: String,
    pub total: f64,
    pub free: f64,
    pub alpha: f64,
}

/// One bar of the extrinsics-by-function chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCount {
    pub name: String,
    pub count: usize,
}

/// Parses a display amount such as `"τ1,234.56"`.
///
/// Everything but ASCII digits, `.` and `-` is dropped, then the longest
/// numeric prefix of the remainder is parsed. No numeric prefix yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    // The cleaned string is pure ASCII, so every index is a char boundary.
    (1..=cleaned.len())
        .rev()
        .find_map(|end| cleaned[..end].parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// The most recent ticks in chronological order, bounded to
/// [`BALANCE_SERIES_LEN`] points.
pub fn balance_series(snapshot: &Snapshot) -> Vec<BalancePoint> {
    snapshot
        .ticks
        .iter()
        .take(BALANCE_SERIES_LEN)
        .rev()
        .map(balance_point)
        .collect()
}

fn balance_point(tick: &Tick) -> BalancePoint {
    BalancePoint {
        time: tick
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        total: parse_amount(&tick.balance.total),
        free: parse_amount(&tick.balance.free),
        alpha: parse_amount(&tick.balance.alpha),
    }
}

/// Extrinsic counts per call function, in first-seen order.
pub fn function_histogram(snapshot: &Snapshot) -> Vec<FunctionCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for extrinsic in &snapshot.extrinsics {
        let group = match extrinsic.call_function.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_FUNCTION,
        };
        let count = counts.entry(group).or_insert_with(|| {
            order.push(group);
            0
        });
        *count += 1;
    }

    order
        .into_iter()
        .map(|group| FunctionCount {
            name: function_label(group),
            count: counts[group],
        })
        .collect()
}

/// Bar label for a call function: only the first underscore becomes a
/// space (`"remove_stake_limit"` -> `"remove stake_limit"`).
pub fn function_label(group: &str) -> String {
    group.replacen('_', " ", 1)
}

/// Everything the renderers need from one snapshot, derived in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub ticks_count: u64,
    pub extrinsics_count: u64,
    pub balance_series: Vec<BalancePoint>,
    pub function_histogram: Vec<FunctionCount>,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            ticks_count: snapshot.ticks_count,
            extrinsics_count: snapshot.extrinsics_count,
            balance_series: balance_series(snapshot),
            function_histogram: function_histogram(snapshot),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Balance, Extrinsic, Tick};
    use chrono::{DateTime, TimeZone, Utc};

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_735_689_600 + secs, 0).unwrap()
    }

    pub fn tick(block_number: u64, total: &str, free: &str, alpha: &str) -> Tick {
        Tick {
            block_number,
            timestamp: at(block_number as i64 * 12),
            balance: Balance {
                total: total.to_string(),
                free: free.to_string(),
                root: "τ0".to_string(),
                alpha: alpha.to_string(),
            },
        }
    }

    pub fn extrinsic(block_number: u64, call_function: Option<&str>) -> Extrinsic {
        Extrinsic {
            block_number,
            timestamp: at(block_number as i64 * 12),
            address: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string(),
            call_module: "SubtensorModule".to_string(),
            call_function: call_function.map(str::to_string),
            hotkey: None,
            netuid: None,
            amount_staked: None,
            limit_price: None,
        }
    }
}
