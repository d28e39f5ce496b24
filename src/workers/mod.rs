//! Background refresh workers
//!
//! - `scheduler`: the repeating timer
//! - `fetcher`: the four concurrent backend requests of one cycle
//! - `refresher`: ties a cycle's result to the state store

pub mod core;
pub mod fetcher;
pub mod refresher;
pub mod scheduler;

pub use refresher::Refresher;
