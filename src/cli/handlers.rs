//! Command handlers
//!
//! One function per command. Handlers take the command context plus a
//! printer and, for paged listings, a confirmation source, so they run the
//! same against a terminal or a buffer.

use super::commands::{ConfigCommand, ListArgs};
use crate::api::{Application, ErdaClient, Member, Project, Runtime};
use crate::config::ConfigStore;
use crate::context::CommandContext;
use crate::error::{Error, Result};
use crate::output::Printer;
use crate::pagination::{view_all, Confirm, Page, PagingState};
use crate::resolve::{Resolved, Selector};
use crate::types::{ApplicationMode, ScopeType, Workspace};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// A listed item, with its owners when they were asked for
#[derive(Debug, Clone, Serialize)]
pub struct Listed<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,
}

impl<T> Listed<T> {
    fn owner_cell(&self) -> String {
        self.owners.as_deref().map(|o| o.join(",")).unwrap_or_default()
    }
}

async fn with_owners<T>(
    client: &ErdaClient,
    scope: ScopeType,
    page: Page<T>,
    enabled: bool,
    id_of: impl Fn(&T) -> u64,
) -> Result<Page<Listed<T>>> {
    let total = page.total;
    let mut items = Vec::with_capacity(page.len());
    for item in page.items {
        let owners = if enabled {
            Some(client.owner_nicks(scope, id_of(&item)).await?)
        } else {
            None
        };
        items.push(Listed { item, owners });
    }
    Ok(Page::new(items, total))
}

fn listing_headers<'a>(leading: &[&'a str], with_owner: bool) -> Vec<&'a str> {
    let mut headers = leading.to_vec();
    if with_owner {
        headers.push("Owner");
    }
    headers.push("Description");
    headers
}

/// Resolve an application, skipping the project when an explicit ID makes it
/// unnecessary
async fn resolve_application_in(
    ctx: &CommandContext,
    org_id: u64,
    project: &Selector,
    application: &Selector,
) -> Result<Resolved> {
    if let (None, Some(id)) = (&application.name, application.id) {
        return Ok(Resolved { name: None, id });
    }
    let project = ctx.project(org_id, project).await?;
    ctx.application(org_id, project.id, application).await
}

// ============================================================================
// Projects
// ============================================================================

/// `project`: page through the caller's projects
pub async fn list_projects<W, C>(
    ctx: &CommandContext,
    org: &Selector,
    list: &ListArgs,
    printer: &mut Printer<W>,
    confirm: &mut C,
) -> Result<u64>
where
    W: Write,
    C: Confirm + ?Sized,
{
    let org_id = ctx.org(org).await?.id;
    let client = &ctx.client;
    let with_owner = list.with_owner;
    let headers = listing_headers(&["Current", "ProjectID", "Name", "DisplayName"], with_owner);

    let shown = view_all(
        move |page_no, page_size| async move {
            let page = client.list_projects_page(org_id, page_no, page_size).await?;
            with_owners(client, ScopeType::Project, page, with_owner, |p: &Project| p.id).await
        },
        |items: &[Listed<Project>], _state: &PagingState| {
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|entry| {
                    let p = &entry.item;
                    let current = if ctx.is_current_project(p.id) { "*" } else { " " };
                    let mut row = vec![
                        current.to_string(),
                        p.id.to_string(),
                        p.name.clone(),
                        p.display_name.clone(),
                    ];
                    if with_owner {
                        row.push(entry.owner_cell());
                    }
                    row.push(p.desc.clone());
                    row
                })
                .collect();
            printer.page(items, &headers, &rows)
        },
        confirm,
        "Continue to display project?",
        list.page_size,
        ctx.interactive,
    )
    .await?;

    printer.finish()?;
    Ok(shown)
}

/// `project create`: create a DevOps project and its monitoring tenant
pub async fn create_project<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    name: &str,
    description: &str,
    printer: &mut Printer<W>,
) -> Result<u64> {
    if name.is_empty() {
        return Err(Error::invalid_argument("Invalid project name"));
    }
    let org_id = ctx.org(org).await?.id;

    info!("Devops project {name} creating...");
    let project_id = ctx.client.create_project(org_id, name, description).await?;
    info!("Devops project {name} created.");

    info!("Msp project {name} creating...");
    ctx.client.create_msp_project(project_id, name).await?;
    info!("Msp project {name} created.");

    printer.success(format!("Project '{name}' created."))?;
    Ok(project_id)
}

/// `project delete`
pub async fn delete_project<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    printer: &mut Printer<W>,
) -> Result<()> {
    let org_id = ctx.org(org).await?.id;
    let project = ctx.project(org_id, project).await?;

    ctx.client.delete_project(org_id, project.id).await?;

    printer.success(format!("Project '{}' deleted.", project.label()))
}

// ============================================================================
// Applications
// ============================================================================

/// `application`: page through the applications of a project
pub async fn list_applications<W, C>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    list: &ListArgs,
    printer: &mut Printer<W>,
    confirm: &mut C,
) -> Result<u64>
where
    W: Write,
    C: Confirm + ?Sized,
{
    let org_id = ctx.org(org).await?.id;
    let project_id = ctx.project(org_id, project).await?.id;
    let client = &ctx.client;
    let with_owner = list.with_owner;
    let headers = listing_headers(&["ApplicationID", "Name", "DisplayName"], with_owner);

    let shown = view_all(
        move |page_no, page_size| async move {
            let page = client
                .list_applications_page(org_id, project_id, page_no, page_size)
                .await?;
            with_owners(client, ScopeType::App, page, with_owner, |a: &Application| a.id).await
        },
        |items: &[Listed<Application>], _state: &PagingState| {
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|entry| {
                    let a = &entry.item;
                    let mut row = vec![a.id.to_string(), a.name.clone(), a.display_name.clone()];
                    if with_owner {
                        row.push(entry.owner_cell());
                    }
                    row.push(a.desc.clone());
                    row
                })
                .collect();
            printer.page(items, &headers, &rows)
        },
        confirm,
        "Continue to display applications?",
        list.page_size,
        ctx.interactive,
    )
    .await?;

    printer.finish()?;
    Ok(shown)
}

/// `application create`
pub async fn create_application<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    name: &str,
    mode: &str,
    description: &str,
    printer: &mut Printer<W>,
) -> Result<Application> {
    if name.is_empty() {
        return Err(Error::invalid_argument("Invalid application name"));
    }
    let mode: ApplicationMode = mode.parse()?;

    let org_id = ctx.org(org).await?.id;
    let project_id = ctx.project(org_id, project).await?.id;

    let application = ctx
        .client
        .create_application(org_id, project_id, name, mode, description)
        .await?;

    printer.success("Application created.")?;
    printer.json(&application)?;
    Ok(application)
}

/// `application inspect`
pub async fn inspect_application<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    application: &Selector,
    only_repo: bool,
    printer: &mut Printer<W>,
) -> Result<Application> {
    let org_id = ctx.org(org).await?.id;
    let application_id = resolve_application_in(ctx, org_id, project, application)
        .await?
        .id;

    let detail = ctx.client.get_application(org_id, application_id).await?;
    if only_repo {
        printer.line(detail.repo_url())?;
    } else {
        printer.json(&detail)?;
    }
    Ok(detail)
}

/// `application member`: page through the members of an application
#[allow(clippy::too_many_arguments)]
pub async fn list_application_members<W, C>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    application: &Selector,
    roles: &[String],
    page_size: u32,
    printer: &mut Printer<W>,
    confirm: &mut C,
) -> Result<u64>
where
    W: Write,
    C: Confirm + ?Sized,
{
    let org_id = ctx.org(org).await?.id;
    let application_id = resolve_application_in(ctx, org_id, project, application)
        .await?
        .id;
    let client = &ctx.client;
    let headers = ["Nick", "Name", "Email", "Mobile", "Roles"];

    let shown = view_all(
        move |page_no, page_size| {
            client.list_members_page(ScopeType::App, application_id, roles, page_no, page_size)
        },
        |items: &[Member], _state: &PagingState| {
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|m| {
                    vec![
                        m.nick.clone(),
                        m.name.clone(),
                        m.email.clone(),
                        m.mobile.clone(),
                        m.roles.join(","),
                    ]
                })
                .collect();
            printer.page(items, &headers, &rows)
        },
        confirm,
        "Continue to display members?",
        page_size,
        ctx.interactive,
    )
    .await?;

    printer.finish()?;
    Ok(shown)
}

// ============================================================================
// Runtimes
// ============================================================================

/// `runtime`: list the runtimes of an application
pub async fn list_runtimes<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    application: &Selector,
    workspace: Option<&str>,
    printer: &mut Printer<W>,
) -> Result<Vec<Runtime>> {
    let workspace = workspace
        .filter(|w| !w.is_empty())
        .map(str::parse::<Workspace>)
        .transpose()?;

    let org_id = ctx.org(org).await?.id;
    let application_id = resolve_application_in(ctx, org_id, project, application)
        .await?
        .id;

    let runtimes = ctx
        .client
        .list_runtimes(org_id, application_id, workspace)
        .await?;

    let rows: Vec<Vec<String>> = runtimes
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.workspace.clone(),
                r.status.clone(),
                r.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    printer.rows(
        &runtimes,
        &["RuntimeID", "Name", "Workspace", "Status", "CreatedAt"],
        &rows,
    )?;
    Ok(runtimes)
}

/// `runtime delete`
pub async fn delete_runtime<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    runtime_id: u64,
    printer: &mut Printer<W>,
) -> Result<()> {
    if runtime_id == 0 {
        return Err(Error::invalid_argument("Invalid runtime id"));
    }
    let org_id = ctx.org(org).await?.id;

    ctx.client.delete_runtime(org_id, runtime_id).await?;

    printer.success("Runtime deleted.")
}

// ============================================================================
// Inspect
// ============================================================================

/// `inspect`: show an organization, project or application as JSON
///
/// The first non-empty of `--org`, the project flags and the application
/// flags picks what to show. With none given, the application of the working
/// directory is shown, or else its project.
pub async fn inspect<W: Write>(
    ctx: &CommandContext,
    org: &Selector,
    project: &Selector,
    application: &Selector,
    printer: &mut Printer<W>,
) -> Result<()> {
    if !org.is_empty() {
        let key = match (&org.name, org.id) {
            (Some(name), _) => name.clone(),
            (None, id) => id.unwrap_or_default().to_string(),
        };
        let detail = ctx.client.get_org(&key).await?;
        return printer.json(&detail);
    }

    let project = if !project.is_empty() {
        project
    } else if !application.is_empty() || !ctx.defaults.application.is_empty() {
        inspect_application(ctx, org, &Selector::default(), application, false, printer).await?;
        return Ok(());
    } else if !ctx.defaults.project.is_empty() {
        &ctx.defaults.project
    } else {
        return Err(Error::invalid_argument(
            "Nothing to inspect, use --org, --project or --application",
        ));
    };

    let org_id = ctx.org(org).await?.id;
    let project_id = ctx.project(org_id, project).await?.id;
    debug!(project_id, "inspecting project");
    let detail = ctx.client.get_project(org_id, project_id).await?;
    printer.json(&detail)
}

// ============================================================================
// Config
// ============================================================================

/// `config ...`: edit the global config and save it back
pub async fn config<W: Write>(
    store: &ConfigStore,
    command: &ConfigCommand,
    org: Option<&str>,
    printer: &mut Printer<W>,
) -> Result<()> {
    let mut config = store.load()?;

    let message = match command {
        ConfigCommand::View => {
            if printer.is_json() {
                printer.json(&config)?;
            } else {
                printer.line(serde_yaml::to_string(&config)?.trim_end())?;
            }
            return Ok(());
        }
        ConfigCommand::SetPlatform { name, server } => {
            config.set_platform(name, server, org)?;
            format!("Platform \"{name}\" set.")
        }
        ConfigCommand::SetContext { name, platform } => {
            config.set_context(name, platform)?;
            format!("Context \"{name}\" set.")
        }
        ConfigCommand::UseContext { name } => {
            config.use_context(name)?;
            format!("Use context \"{name}\".")
        }
        ConfigCommand::DeletePlatform { name } => {
            if !config.delete_platform(name) {
                debug!(name = %name, "platform to delete does not exist");
            }
            format!("Platform \"{name}\" deleted.")
        }
        ConfigCommand::DeleteContext { name } => {
            if !config.delete_context(name) {
                debug!(name = %name, "context to delete does not exist");
            }
            format!("Context \"{name}\" deleted.")
        }
    };

    store.save(&config).await?;
    printer.success(message)
}
