// sentire - CLI for the Sentry API
// Copyright (C) 2024 Mathias Uhl <mathiasuhl@gmx.de>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod api;
mod client;
mod config;
mod error;
mod inspect;
mod models;
mod output;
mod pagination;

use std::env;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::process::ExitCode;

use crate::api::{
    EventsApi, GetIssueEventOptions, ListIssueEventsOptions, ListIssuesOptions,
    ListProjectEventsOptions, OrganizationsApi, ProjectsApi, StatsOptions,
};
use crate::client::ApiClient;
use crate::config::{TOKEN_ENV, mask_token};
use crate::output::{Output, OutputFormat};
use crate::pagination::{PageOptions, collect_pages};
use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SENTIRE_LOG";
const DEFAULT_ISSUE_QUERY: &str = "is:unresolved issue.priority:[high,medium]";

#[derive(Parser)]
#[command(
    name = "sentire",
    version,
    about = "CLI for the Sentry API",
    long_about = "Query events, issues, projects and organization stats from the Sentry API.\n\n\
                  Set your token with `export SENTRY_API_TOKEN=...` or `sentire configure --token ...`."
)]
struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        default_value = "json",
        value_name = "FORMAT",
        help = format!("Output format: {}", OutputFormat::NAMES.join(", "))
    )]
    format: String,

    #[arg(long, short = 'v', global = true, help = "Log requests and pagination to stderr")]
    verbose: bool,

    #[arg(
        long,
        global = true,
        help = "API token for this invocation (otherwise SENTRY_API_TOKEN or the config file)"
    )]
    token: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "URL",
        help = "Base URL for the API (defaults to https://sentry.io/api/0, or SENTRY_BASE_URL)"
    )]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Events and issues
    #[command(subcommand)]
    Events(EventsCommand),
    /// Projects visible to the token
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// Organization projects and stats
    #[command(subcommand)]
    Org(OrgCommand),
    /// Show the recommended event of an issue given its URL
    Inspect {
        /// e.g. https://acme.sentry.io/issues/1234567890/
        url: String,
    },
    /// Persist the token passed with --token to the config file
    Configure,
    /// Show the config file location and the token in use (masked)
    ConfigShow,
    /// Show version information
    Version {
        #[arg(long, short = 'd', help = "Include git commit and platform")]
        detailed: bool,
    },
    /// Generate shell completion scripts
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
enum EventsCommand {
    /// List events of a project
    ListProject {
        org: String,
        project: String,
        #[command(flatten)]
        range: TimeRange,
        #[arg(long, help = "Include the full event body")]
        full: bool,
        #[arg(long, help = "Return events in random order")]
        sample: bool,
        #[command(flatten)]
        paging: Paging,
    },
    /// List events of an issue
    ListIssue {
        org: String,
        issue: String,
        #[command(flatten)]
        range: TimeRange,
        #[arg(long, value_name = "ENV")]
        environment: Vec<String>,
        #[arg(long, help = "Include the full event body")]
        full: bool,
        #[arg(long, help = "Return events in random order")]
        sample: bool,
        #[arg(long, help = "Search query, e.g. `user.email:jane@example.com`")]
        query: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    /// List issues of an organization
    ListIssues {
        org: String,
        #[arg(long, value_name = "ENV")]
        environment: Vec<String>,
        #[arg(long, value_name = "ID", help = "Project id (repeatable)")]
        project: Vec<String>,
        #[command(flatten)]
        range: TimeRange,
        #[arg(long, default_value = DEFAULT_ISSUE_QUERY)]
        query: String,
        #[arg(long, help = "date, new, freq, user, trends or inbox")]
        sort: Option<String>,
        #[arg(long, help = "Page size")]
        limit: Option<u32>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Get one event of a project
    GetEvent {
        org: String,
        project: String,
        event: String,
    },
    /// Get one issue
    GetIssue { org: String, issue: String },
    /// Get one event of an issue (`latest`, `oldest`, `recommended` or an id)
    GetIssueEvent {
        org: String,
        issue: String,
        event: String,
        #[arg(long, value_name = "ENV")]
        environment: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ProjectsCommand {
    /// List all projects
    List {
        #[command(flatten)]
        paging: Paging,
    },
    /// Get one project
    Get { org: String, project: String },
}

#[derive(Subcommand)]
enum OrgCommand {
    /// List the projects of an organization
    ListProjects {
        org: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Event counts for an organization
    Stats {
        org: String,
        #[arg(long, default_value = "sum(quantity)", help = "sum(quantity) or sum(times_seen)")]
        field: String,
        #[arg(long, value_name = "PERIOD")]
        period: Option<String>,
        #[arg(long, help = "Time series resolution, e.g. 1h")]
        interval: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_name = "ID")]
        project: Vec<String>,
        #[arg(long)]
        category: Vec<String>,
        #[arg(long)]
        outcome: Vec<String>,
        #[arg(long)]
        reason: Vec<String>,
        #[arg(long)]
        download: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct TimeRange {
    #[arg(long, value_name = "PERIOD", help = "Relative period, e.g. 24h or 14d")]
    period: Option<String>,
    #[arg(long, help = "Start time (ISO-8601)")]
    start: Option<String>,
    #[arg(long, help = "End time (ISO-8601)")]
    end: Option<String>,
}

#[derive(Args, Debug, Clone, Copy)]
struct Paging {
    #[arg(long, help = "Follow pagination until the last page")]
    all: bool,
    #[arg(
        long,
        value_name = "N",
        requires = "all",
        help = "Stop after N pages when using --all"
    )]
    max_pages: Option<NonZeroUsize>,
}

impl From<Paging> for PageOptions {
    fn from(value: Paging) -> Self {
        if value.all {
            PageOptions::all(value.max_pages)
        } else {
            PageOptions::single()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Flags every remote command needs.
struct Globals {
    format: String,
    token: Option<String>,
    base_url: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if err.downcast_ref::<error::Error>().and_then(error::Error::status) == Some(401) {
                eprintln!(
                    "Hint: the token was rejected; check {TOKEN_ENV} or run `sentire configure --token <token>`"
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sentire=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let globals = Globals {
        format: cli.format,
        token: cli.token,
        base_url: cli.base_url,
    };

    match cli.command {
        Commands::Events(command) => remote(globals, |client| events(client, command)),
        Commands::Projects(command) => remote(globals, |client| projects(client, command)),
        Commands::Org(command) => remote(globals, |client| organization(client, command)),
        Commands::Inspect { url } => remote(globals, |client| inspect_issue(client, &url)),
        Commands::Configure => {
            let token = globals
                .token
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| anyhow!("configure requires --token <token>"))?;
            let mut existing = config::load()?.unwrap_or_default();
            existing.sentry_api_token = Some(token.trim().to_string());
            let path = config::save(&existing)?;
            println!("Saved API token to {}", path.display());
            Ok(())
        }
        Commands::ConfigShow => config_show(),
        Commands::Version { detailed } => {
            println!("{}", version_info(detailed));
            Ok(())
        }
        Commands::Completion { shell } => {
            use clap_complete::{generate, shells};
            let mut cmd = Cli::command();
            let bin = cmd.get_name().to_string();
            match shell {
                CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin, &mut io::stdout()),
                CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin, &mut io::stdout()),
                CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin, &mut io::stdout()),
                CompletionShell::PowerShell => {
                    generate(shells::PowerShell, &mut cmd, bin, &mut io::stdout())
                }
            }
            Ok(())
        }
    }
}

/// Build the formatter, then the client, then fetch and render. The
/// formatter comes first so a bad `--format` never reaches the network.
fn remote<F>(globals: Globals, fetch: F) -> Result<()>
where
    F: FnOnce(&mut ApiClient) -> Result<Output>,
{
    let stdout = io::stdout();
    let mut sink = stdout.lock();
    let mut formatter = output::formatter(&globals.format, &mut sink)?;

    let effective = config::resolve(globals.token, globals.base_url)?;
    debug!(source = %effective.token_source, base_url = %effective.base_url, "using API token");
    let mut client = ApiClient::new(&effective.base_url, &effective.token)?;

    let result = fetch(&mut client)?;
    output::render(formatter.as_mut(), &result)?;
    drop(formatter);
    sink.flush().context("flushing output")?;

    let rate_limit = client.rate_limit();
    debug!(?rate_limit, "final rate limit state");
    if rate_limit.remaining == Some(0) {
        warn!(reset = ?rate_limit.reset, "rate limit exhausted");
    }
    Ok(())
}

fn events(client: &mut ApiClient, command: EventsCommand) -> Result<Output> {
    let mut api = EventsApi::new(client);
    let output = match command {
        EventsCommand::ListProject {
            org,
            project,
            range,
            full,
            sample,
            paging,
        } => {
            let opts = ListProjectEventsOptions {
                stats_period: range.period.unwrap_or_default(),
                start: range.start.unwrap_or_default(),
                end: range.end.unwrap_or_default(),
                full,
                sample,
            };
            let items = collect_pages(
                |cursor| api.list_project_events(&org, &project, &opts, cursor),
                paging.into(),
            )?;
            Output::list(items)
        }
        EventsCommand::ListIssue {
            org,
            issue,
            range,
            environment,
            full,
            sample,
            query,
            paging,
        } => {
            let opts = ListIssueEventsOptions {
                start: range.start.unwrap_or_default(),
                end: range.end.unwrap_or_default(),
                stats_period: range.period.unwrap_or_default(),
                environment,
                full,
                sample,
                query: query.unwrap_or_default(),
            };
            let items = collect_pages(
                |cursor| api.list_issue_events(&org, &issue, &opts, cursor),
                paging.into(),
            )?;
            Output::list(items)
        }
        EventsCommand::ListIssues {
            org,
            environment,
            project,
            range,
            query,
            sort,
            limit,
            paging,
        } => {
            let opts = ListIssuesOptions {
                environment,
                project,
                stats_period: range.period.unwrap_or_default(),
                start: range.start.unwrap_or_default(),
                end: range.end.unwrap_or_default(),
                query,
                sort: sort.unwrap_or_default(),
                limit: limit.unwrap_or_default(),
            };
            let items = collect_pages(|cursor| api.list_issues(&org, &opts, cursor), paging.into())?;
            Output::list(items)
        }
        EventsCommand::GetEvent {
            org,
            project,
            event,
        } => Output::item(api.get_project_event(&org, &project, &event)?),
        EventsCommand::GetIssue { org, issue } => {
            Output::item(api.get_issue(&org, &issue)?)
        }
        EventsCommand::GetIssueEvent {
            org,
            issue,
            event,
            environment,
        } => {
            let opts = GetIssueEventOptions { environment };
            Output::item(api.get_issue_event(&org, &issue, &event, &opts)?)
        }
    };
    Ok(output)
}

fn projects(client: &mut ApiClient, command: ProjectsCommand) -> Result<Output> {
    let mut api = ProjectsApi::new(client);
    let output = match command {
        ProjectsCommand::List { paging } => {
            Output::list(collect_pages(|cursor| api.list_projects(cursor), paging.into())?)
        }
        ProjectsCommand::Get { org, project } => {
            Output::item(api.get_project(&org, &project)?)
        }
    };
    Ok(output)
}

fn organization(client: &mut ApiClient, command: OrgCommand) -> Result<Output> {
    let mut api = OrganizationsApi::new(client);
    let output = match command {
        OrgCommand::ListProjects { org, paging } => Output::list(collect_pages(
            |cursor| api.list_projects(&org, cursor),
            paging.into(),
        )?),
        OrgCommand::Stats {
            org,
            field,
            period,
            interval,
            start,
            end,
            project,
            category,
            outcome,
            reason,
            download,
        } => {
            let opts = StatsOptions {
                field,
                stats_period: period.unwrap_or_default(),
                interval: interval.unwrap_or_default(),
                start: start.unwrap_or_default(),
                end: end.unwrap_or_default(),
                project,
                category,
                outcome,
                reason,
                download,
            };
            Output::item(api.stats(&org, &opts)?)
        }
    };
    Ok(output)
}

fn inspect_issue(client: &mut ApiClient, url: &str) -> Result<Output> {
    let parsed = inspect::parse_issue_url(url).context("failed to parse Sentry URL")?;
    debug!(org = %parsed.organization, issue = %parsed.issue_id, "inspecting issue");
    let event = EventsApi::new(client)
        .get_issue_event(
            &parsed.organization,
            &parsed.issue_id,
            "recommended",
            &GetIssueEventOptions::default(),
        )
        .context("failed to retrieve issue event")?;
    Ok(Output::item(event))
}

fn config_show() -> Result<()> {
    let path = config::config_path()?;
    let file = config::load()?.unwrap_or_default();
    let env_token = env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
    let active = match (&env_token, &file.sentry_api_token) {
        (Some(_), _) => "environment",
        (None, Some(_)) => "config file",
        (None, None) => "none",
    };

    let shown = json!({
        "config_path": path.display().to_string(),
        "token_source": active,
        "sentry_api_token": file.sentry_api_token.as_deref().map(mask_token),
        "env_token": env_token.as_deref().map(mask_token),
    });
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

fn version_info(detailed: bool) -> String {
    let mut info = format!("sentire version {}", env!("CARGO_PKG_VERSION"));
    if detailed {
        info.push_str(&format!(
            "\nGit commit: {}\nOS/Arch: {}/{}",
            option_env!("SENTIRE_GIT_COMMIT").unwrap_or("unknown"),
            env::consts::OS,
            env::consts::ARCH,
        ));
    }
    info
}
