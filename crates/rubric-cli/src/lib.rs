//! Library side of the `rubric` command-line tool.

pub mod logging;
pub mod pipeline;
pub mod types;
