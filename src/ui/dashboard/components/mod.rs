//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod charts;
pub mod counters;
pub mod footer;
pub mod header;
pub mod info_panel;
pub mod loading;
pub mod logs;
pub mod tables;
