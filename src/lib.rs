//! Personal time analytics on top of calendar exports.
//! Events are classified into work, study and life by keyword rules, summed per day and checked
//! against daily coding, study and sport goals. Everything is available through a terminal.
//!

pub mod analysis;
pub mod cli;
pub mod config;
pub mod source;
pub mod utils;
