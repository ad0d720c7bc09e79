//! CLI commands and argument parsing

use crate::output::OutputFormat;
use crate::resolve::Selector;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Erda DevOps platform
#[derive(Parser, Debug)]
#[command(name = "erda-cli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Platform server URL, overriding the current context
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Global config file (default: ~/.erda.d/config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Name of the organization
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// ID of the organization
    #[arg(long, global = true)]
    pub org_id: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Don't print table headers
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Ask before showing the next page (default when attached to a terminal)
    #[arg(long, global = true, overrides_with = "no_interactive")]
    pub interactive: bool,

    /// Never ask between pages
    #[arg(long, global = true, overrides_with = "interactive")]
    pub no_interactive: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Explicit organization flags
    pub fn org_selector(&self) -> Selector {
        Selector::new(self.org.clone(), self.org_id)
    }

    /// Interactive paging, from the flags or else from `attached`
    pub fn interactive_or(&self, attached: bool) -> bool {
        if self.no_interactive {
            false
        } else if self.interactive {
            true
        } else {
            attached
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects, or manage them
    Project(ProjectArgs),

    /// List applications of a project, or manage them
    Application(ApplicationArgs),

    /// List runtimes of an application, or delete one
    Runtime(RuntimeArgs),

    /// Show an organization, project or application
    ///
    /// Without a selection flag, shows the application of the working
    /// directory, or else its project.
    Inspect(InspectArgs),

    /// View or edit the global config
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ============================================================================
// Shared flags
// ============================================================================

/// Listing flags
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Number of items per page
    #[arg(long, default_value_t = 10)]
    pub page_size: u32,

    /// Also show the owners of each item
    #[arg(long)]
    pub with_owner: bool,
}

/// Project selection flags
///
/// Global so they are accepted before or after a subcommand name.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectFlags {
    /// Name of the project
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// ID of the project
    #[arg(long, global = true)]
    pub project_id: Option<u64>,
}

impl ProjectFlags {
    /// Flags as a selector
    pub fn selector(&self) -> Selector {
        Selector::new(self.project.clone(), self.project_id)
    }
}

/// Application selection flags
#[derive(Args, Debug, Clone, Default)]
pub struct ApplicationFlags {
    /// Name of the application
    #[arg(long, global = true)]
    pub application: Option<String>,

    /// ID of the application
    #[arg(long, global = true)]
    pub application_id: Option<u64>,
}

impl ApplicationFlags {
    /// Flags as a selector
    pub fn selector(&self) -> Selector {
        Selector::new(self.application.clone(), self.application_id)
    }
}

// ============================================================================
// project
// ============================================================================

/// `project` arguments
#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: Option<ProjectCommand>,

    #[command(flatten)]
    pub list: ListArgs,
}

/// `project` subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a DevOps project and its monitoring tenant
    Create {
        /// Name of the project
        #[arg(short, long)]
        name: String,

        /// Description of the project
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a project
    Delete {
        #[command(flatten)]
        project: ProjectFlags,
    },
}

// ============================================================================
// application
// ============================================================================

/// `application` arguments
#[derive(Args, Debug)]
pub struct ApplicationArgs {
    #[command(subcommand)]
    pub command: Option<ApplicationCommand>,

    #[command(flatten)]
    pub project: ProjectFlags,

    #[command(flatten)]
    pub application: ApplicationFlags,

    #[command(flatten)]
    pub list: ListArgs,
}

/// `application` subcommands
#[derive(Subcommand, Debug)]
pub enum ApplicationCommand {
    /// Create an application
    Create {
        /// Name of the application
        #[arg(short, long)]
        name: String,

        /// Application mode: LIBRARY, SERVICE, BIGDATA or PROJECT_SERVICE
        #[arg(short, long, default_value = "SERVICE")]
        mode: String,

        /// Description of the application
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Show the details of an application
    Inspect {
        /// Only print the repository URL
        #[arg(long)]
        only_repo: bool,
    },

    /// List the members of an application
    Member {
        /// Only list members with these roles
        #[arg(long)]
        roles: Vec<String>,

        /// Number of members per page
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

// ============================================================================
// runtime
// ============================================================================

/// `runtime` arguments
#[derive(Args, Debug)]
pub struct RuntimeArgs {
    #[command(subcommand)]
    pub command: Option<RuntimeCommand>,

    #[command(flatten)]
    pub project: ProjectFlags,

    #[command(flatten)]
    pub application: ApplicationFlags,

    /// Only list runtimes of this workspace (DEV, TEST, STAGING, PROD)
    #[arg(long)]
    pub workspace: Option<String>,
}

/// `runtime` subcommands
#[derive(Subcommand, Debug)]
pub enum RuntimeCommand {
    /// Delete a runtime
    Delete {
        /// ID of the runtime
        #[arg(long)]
        runtime_id: u64,
    },
}

// ============================================================================
// inspect
// ============================================================================

/// `inspect` arguments
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub project: ProjectFlags,

    #[command(flatten)]
    pub application: ApplicationFlags,
}

// ============================================================================
// config
// ============================================================================

/// `config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the global config
    View,

    /// Add a platform or change its server (`--org` sets its default organization)
    SetPlatform {
        /// Name of the platform
        name: String,

        /// Server URL of the platform
        #[arg(long)]
        server: String,
    },

    /// Add a context or point it at another platform
    SetContext {
        /// Name of the context
        name: String,

        /// Platform the context uses
        #[arg(long)]
        platform: String,
    },

    /// Select the current context
    UseContext {
        /// Name of the context
        name: String,
    },

    /// Remove a platform
    DeletePlatform {
        /// Name of the platform
        name: String,
    },

    /// Remove a context
    DeleteContext {
        /// Name of the context
        name: String,
    },
}
