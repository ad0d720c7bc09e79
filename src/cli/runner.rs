//! CLI runner - executes commands

use super::commands::{ApplicationCommand, Cli, Commands, ProjectCommand, RuntimeCommand};
use super::handlers;
use crate::config::{find_project_config, load_project_config, ConfigStore, ProjectInfo};
use crate::context::{CommandContext, ContextSources, Defaults};
use crate::error::Result;
use crate::output::Printer;
use crate::pagination::PromptConfirm;
use is_terminal::IsTerminal;
use std::io::{self, Stdout};
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut printer = self.printer();

        if let Commands::Config(command) = &self.cli.command {
            let store = self.store()?;
            return handlers::config(&store, command, self.cli.org.as_deref(), &mut printer).await;
        }

        let ctx = self.context()?;
        let org = self.cli.org_selector();
        let mut confirm = PromptConfirm::stdio();

        match &self.cli.command {
            Commands::Project(args) => match &args.command {
                None => {
                    handlers::list_projects(&ctx, &org, &args.list, &mut printer, &mut confirm)
                        .await?;
                }
                Some(ProjectCommand::Create { name, description }) => {
                    handlers::create_project(&ctx, &org, name, description, &mut printer).await?;
                }
                Some(ProjectCommand::Delete { project }) => {
                    handlers::delete_project(&ctx, &org, &project.selector(), &mut printer)
                        .await?;
                }
            },
            Commands::Application(args) => match &args.command {
                None => {
                    handlers::list_applications(
                        &ctx,
                        &org,
                        &args.project.selector(),
                        &args.list,
                        &mut printer,
                        &mut confirm,
                    )
                    .await?;
                }
                Some(ApplicationCommand::Create {
                    name,
                    mode,
                    description,
                }) => {
                    handlers::create_application(
                        &ctx,
                        &org,
                        &args.project.selector(),
                        name,
                        mode,
                        description,
                        &mut printer,
                    )
                    .await?;
                }
                Some(ApplicationCommand::Inspect { only_repo }) => {
                    handlers::inspect_application(
                        &ctx,
                        &org,
                        &args.project.selector(),
                        &args.application.selector(),
                        *only_repo,
                        &mut printer,
                    )
                    .await?;
                }
                Some(ApplicationCommand::Member { roles, page_size }) => {
                    handlers::list_application_members(
                        &ctx,
                        &org,
                        &args.project.selector(),
                        &args.application.selector(),
                        roles,
                        *page_size,
                        &mut printer,
                        &mut confirm,
                    )
                    .await?;
                }
            },
            Commands::Runtime(args) => match &args.command {
                None => {
                    handlers::list_runtimes(
                        &ctx,
                        &org,
                        &args.project.selector(),
                        &args.application.selector(),
                        args.workspace.as_deref(),
                        &mut printer,
                    )
                    .await?;
                }
                Some(RuntimeCommand::Delete { runtime_id }) => {
                    handlers::delete_runtime(&ctx, &org, *runtime_id, &mut printer).await?;
                }
            },
            Commands::Inspect(args) => {
                handlers::inspect(
                    &ctx,
                    &org,
                    &args.project.selector(),
                    &args.application.selector(),
                    &mut printer,
                )
                .await?;
            }
            Commands::Config(_) => {}
        }

        Ok(())
    }

    fn printer(&self) -> Printer<Stdout> {
        Printer::stdout(self.cli.output, self.cli.no_headers)
    }

    /// Global config store, from `--config` or the home directory
    fn store(&self) -> Result<ConfigStore> {
        match &self.cli.config {
            Some(path) => Ok(ConfigStore::new(path)),
            None => ConfigStore::at_default(),
        }
    }

    /// Nearest project config above the working directory
    fn project_config(&self, cwd: &Path, global: &ConfigStore) -> Result<Option<ProjectInfo>> {
        let Some(path) = find_project_config(cwd, Some(global.path())) else {
            return Ok(None);
        };
        let info = load_project_config(&path)?;
        debug!(path = %path.display(), project = %info.project, "loaded project config");
        Ok(Some(info))
    }

    /// Build the command context from flags and config files
    fn context(&self) -> Result<CommandContext> {
        let store = self.store()?;
        let global = store.load()?;
        let cwd = std::env::current_dir()?;
        let project = self.project_config(&cwd, &store)?;
        let working_dir = cwd.file_name().and_then(|n| n.to_str());

        let defaults = Defaults::from_sources(ContextSources {
            host: self.cli.host.as_deref(),
            global: Some(&global),
            project: project.as_ref(),
            working_dir,
        })?;

        let attached = io::stdin().is_terminal() && io::stdout().is_terminal();
        CommandContext::new(defaults, self.cli.interactive_or(attached))
    }
}
