pub mod clean;
pub mod config;
pub mod error;
pub mod indexer;
pub mod worker;
