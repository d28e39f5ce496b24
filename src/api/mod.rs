use crate::api::error::ApiError;
use crate::models::{Extrinsic, Tick};

pub(crate) mod client;
pub use client::{ApiClient, StatusPolicy};
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Read-only view of the ledger backend.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LedgerApi: Send + Sync {
    /// Total number of ticks recorded by the backend.
    async fn ticks_count(&self) -> Result<u64, ApiError>;

    /// Total number of extrinsics recorded by the backend.
    async fn extrinsics_count(&self) -> Result<u64, ApiError>;

    /// Most recent ticks, newest first, at most `limit` entries.
    async fn ticks(&self, limit: u32) -> Result<Vec<Tick>, ApiError>;

    /// Most recent extrinsics, newest first, at most `limit` entries.
    async fn extrinsics(&self, limit: u32) -> Result<Vec<Extrinsic>, ApiError>;
}
