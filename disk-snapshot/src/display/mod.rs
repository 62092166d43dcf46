//! Presentation of snapshots and deltas for the command line.

pub mod listing;
pub mod units;
