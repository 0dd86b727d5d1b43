//! Data models: the extraction record and configuration.

pub mod config;
pub mod statement;
