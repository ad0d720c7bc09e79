//! CLI module
//!
//! Command-line interface for the platform.
//!
//! # Commands
//!
//! - `project` - List, create and delete projects
//! - `application` - List, create and inspect applications, list members
//! - `runtime` - List and delete runtimes
//! - `config` - Manage platforms and contexts in the global config

mod commands;
pub mod handlers;
mod runner;

pub use commands::{
    ApplicationCommand, ApplicationFlags, Cli, Commands, ConfigCommand, ListArgs, ProjectCommand,
    ProjectFlags, RuntimeCommand,
};
pub use runner::Runner;
