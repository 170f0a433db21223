//! Library surface of the `ecglab` binary, split out so the pipeline
//! orchestration is testable without spawning a process.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
