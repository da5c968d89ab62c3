//! Synthetic retail dataset generator: daily financial series, territory
//! performance, transactions, and the analytics computed over them.

pub mod analytics;
pub mod cli;
pub mod data;
pub mod error;
pub mod profile;
pub mod random;
pub mod registry;
pub mod results;
pub mod snapshot;
pub mod stats;
