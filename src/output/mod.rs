//! Output module
//!
//! Prints command results to stdout, either as a plain table or as JSON.
//! Logs and prompts go to stderr so either form can be piped.

mod printer;

pub use printer::{render_table, OutputFormat, Printer};
