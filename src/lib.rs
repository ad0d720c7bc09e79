// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Erda CLI
//!
//! Command-line client for the Erda DevOps platform: projects,
//! applications, members and runtimes of an organization.
//!
//! ## Features
//!
//! - **Paged listings**: Walk any `pageNo`/`pageSize` API to the end, or
//!   show it page by page with a prompt in between
//! - **Name or ID**: Every resource flag accepts a name or an ID, falling
//!   back to the current context and the project config
//! - **Contexts**: Named platforms and contexts in `~/.erda.d/config`
//! - **Retries and rate limiting**: Shared HTTP client with backoff
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use erda_cli::api::ErdaClient;
//! use erda_cli::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ErdaClient::new("https://erda.example.com")?;
//!     let org = client.get_org("erda").await?;
//!
//!     // Every page of the organization's projects
//!     for project in client.list_projects(org.id).await? {
//!         println!("{} {}", project.id, project.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CLI (clap) + handlers                      │
//! │   project   application   runtime   inspect   config         │
//! └──────────────────────────────────────────────────────────────┘
//!            │                 │                    │
//! ┌──────────┴──────┬──────────┴──────┬─────────────┴──────────┐
//! │ Context/Resolve │   Pagination    │   Config     Output    │
//! ├─────────────────┼─────────────────┼────────────────────────┤
//! │ name → ID       │ PagingAll       │ platforms  table       │
//! │ defaults        │ PagingView      │ contexts   json        │
//! │                 │ Confirm         │ project    success     │
//! └─────────────────┴─────────────────┴────────────────────────┘
//!                          │
//!              ┌───────────┴────────────┐
//!              │ API client over HTTP   │
//!              │ retry, rate limit      │
//!              └────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Paged listing traversal
pub mod pagination;

/// Typed platform API
pub mod api;

/// Name-or-ID resolution
pub mod resolve;

/// Global and project configuration
pub mod config;

/// Per-invocation command context
pub mod context;

/// Table and JSON output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use pagination::{paging_all, paging_view, Confirm, Page, PageFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
