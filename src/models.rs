//! Backend record types and the committed snapshot.
//!
//! Every record is decoded through serde into these types; a body that
//! does not match fails the decode instead of yielding a partial value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Balance amounts as display strings, e.g. `"τ1,234.56"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub total: String,
    pub free: String,
    pub root: String,
    pub alpha: String,
}

/// A point-in-time balance snapshot at a given block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub block_number: u64,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    pub balance: Balance,
}

/// A recorded chain operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrinsic {
    pub block_number: u64,
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    pub address: String,
    pub call_module: String,
    #[serde(default)]
    pub call_function: Option<String>,
    #[serde(default)]
    pub hotkey: Option<String>,
    #[serde(default)]
    pub netuid: Option<i64>,
    #[serde(default)]
    pub amount_staked: Option<u64>,
    #[serde(default)]
    pub limit_price: Option<f64>,
}

/// The unit of committed view state.
///
/// `ticks_count` and `extrinsics_count` are backend-side totals and are
/// not tied to the lengths of the fetched lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub ticks: Vec<Tick>,
    pub extrinsics: Vec<Extrinsic>,
    pub ticks_count: u64,
    pub extrinsics_count: u64,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
            && self.extrinsics.is_empty()
            && self.ticks_count == 0
            && self.extrinsics_count == 0
    }
}

/// Accepts RFC 3339 instants as well as offset-less ISO-8601 timestamps,
/// which are read as UTC.
fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}"))
    })
}

pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extrinsic_optional_fields_accept_null() {
        let ext: Extrinsic = serde_json::from_value(json!({
            "block_number": 42,
            "timestamp": "2025-01-02T03:04:05Z",
            "address": "5F...",
            "call_module": "SubtensorModule",
            "call_function": null,
            "hotkey": null,
            "netuid": null,
            "amount_staked": null,
            "limit_price": null
        }))
        .unwrap();
        assert_eq!(ext.call_function, None);
        assert_eq!(ext.netuid, None);
        assert_eq!(ext.amount_staked, None);
    }

    #[test]
    fn test_extrinsic_optional_fields_may_be_omitted() {
        let ext: Extrinsic = serde_json::from_value(json!({
            "block_number": 1,
            "timestamp": "2025-01-02T03:04:05+02:00",
            "address": "5F...",
            "call_module": "SubtensorModule",
            "call_function": "add_stake",
            "netuid": 3,
            "amount_staked": 2_500_000_000u64
        }))
        .unwrap();
        assert_eq!(ext.call_function.as_deref(), Some("add_stake"));
        assert_eq!(ext.netuid, Some(3));
        assert_eq!(ext.hotkey, None);
        assert_eq!(ext.timestamp.to_rfc3339(), "2025-01-02T01:04:05+00:00");
    }

    #[test]
    fn test_extrinsic_accepts_any_integer_netuid() {
        let body = r#"[
            {"block_number":1,"timestamp":"2025-01-02T03:04:05Z","address":"5F","call_module":"SubtensorModule","call_function":"add_stake","netuid":70000},
            {"block_number":2,"timestamp":"2025-01-02T03:04:05Z","address":"5F","call_module":"SubtensorModule","call_function":"add_stake","netuid":-1}
        ]"#;
        let extrinsics: Vec<Extrinsic> = serde_json::from_str(body).unwrap();
        assert_eq!(extrinsics[0].netuid, Some(70_000));
        assert_eq!(extrinsics[1].netuid, Some(-1));
    }

    #[test]
    fn test_tick_rejects_missing_balance() {
        let result: Result<Tick, _> = serde_json::from_value(json!({
            "block_number": 100,
            "timestamp": "2025-01-02T03:04:05Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_tick_rejects_bad_timestamp() {
        let result: Result<Tick, _> = serde_json::from_value(json!({
            "block_number": 100,
            "timestamp": "yesterday",
            "balance": {"total": "τ1", "free": "τ1", "root": "τ0", "alpha": "τ0"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_instant_accepts_naive_timestamps() {
        let parsed = parse_instant("2025-01-02T03:04:05.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-02T03:04:05.123456+00:00");
        assert!(parse_instant("2025-01-02 03:04:05").is_some());
        assert!(parse_instant("not a date").is_none());
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        assert!(Snapshot::default().is_empty());
    }
}
