pub mod failover;
pub mod sql;
pub mod url;
