//! One refresh cycle's worth of backend requests

use crate::api::LedgerApi;
use crate::api::error::ApiError;
use crate::logging::LogLevel;
use crate::models::Snapshot;
use futures::TryFutureExt;
use thiserror::Error;

/// A failed cycle: the first of the four requests that failed.
#[derive(Error, Debug)]
#[error("{endpoint}: {source}")]
pub struct FetchError {
    pub endpoint: &'static str,
    #[source]
    pub source: ApiError,
}

impl FetchError {
    pub fn new(endpoint: &'static str, source: ApiError) -> Self {
        Self { endpoint, source }
    }

    /// Log level for reporting this failure.
    pub fn log_level(&self) -> LogLevel {
        match &self.source {
            // Backend down or unreachable - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Contract mismatch between dashboard and backend
            ApiError::Decode { .. } => LogLevel::Error,
            ApiError::Http { .. } => LogLevel::Error,
        }
    }
}

/// Issues the four backend requests concurrently and assembles a snapshot.
///
/// The cycle succeeds only if all four requests succeed; the first failure
/// is returned and every other result is discarded.
pub async fn fetch_cycle(api: &dyn LedgerApi, limit: u32) -> Result<Snapshot, FetchError> {
    let (ticks_count, extrinsics_count, ticks, extrinsics) = futures::try_join!(
        api.ticks_count()
            .map_err(|e| FetchError::new("/ticks/count", e)),
        api.extrinsics_count()
            .map_err(|e| FetchError::new("/extrinsics/count", e)),
        api.ticks(limit).map_err(|e| FetchError::new("/ticks", e)),
        api.extrinsics(limit)
            .map_err(|e| FetchError::new("/extrinsics", e)),
    )?;

    Ok(Snapshot {
        ticks,
        extrinsics,
        ticks_count,
        extrinsics_count,
    })
}
