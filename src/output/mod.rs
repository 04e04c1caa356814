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

//! Rendering of decoded records in one of four output formats.
//!
//! A [`Formatter`] is built once per invocation from the `--format` name and
//! then receives whatever the command produced through [`render`], which
//! picks the typed method for known record shapes and the generic path for
//! everything else.

mod describe;
mod json;
mod markdown;
mod table;
mod text;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Event, Issue, Organization, OrganizationStats, Project};

pub use describe::Describe;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use table::TableFormatter;
pub use text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Text,
    Markdown,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["json", "table", "text", "markdown"];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Text => "text",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "text" => Ok(OutputFormat::Text),
            "markdown" => Ok(OutputFormat::Markdown),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One method per known record shape plus a generic fallback.
pub trait Formatter {
    fn format_event(&mut self, event: &Event) -> Result<()>;
    fn format_events(&mut self, events: &[Event]) -> Result<()>;
    fn format_issue(&mut self, issue: &Issue) -> Result<()>;
    fn format_issues(&mut self, issues: &[Issue]) -> Result<()>;
    fn format_project(&mut self, project: &Project) -> Result<()>;
    fn format_projects(&mut self, projects: &[Project]) -> Result<()>;
    fn format_org_stats(&mut self, stats: &OrganizationStats) -> Result<()>;
    fn format_generic(&mut self, data: Generic<'_>) -> Result<()>;
}

/// Build the formatter for `name`, writing to `sink`.
///
/// Fails with [`Error::UnsupportedFormat`] for anything but the four known
/// names.
pub fn formatter<'w>(name: &str, sink: &'w mut dyn Write) -> Result<Box<dyn Formatter + 'w>> {
    let format: OutputFormat = name.parse()?;
    Ok(match format {
        OutputFormat::Json => Box::new(JsonFormatter::new(sink)),
        OutputFormat::Table => Box::new(TableFormatter::new(sink)),
        OutputFormat::Text => Box::new(TextFormatter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(sink)),
    })
}

/// A single item of a heterogeneous listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Event(Box<Event>),
    Issue(Box<Issue>),
    Project(Box<Project>),
    Organization(Box<Organization>),
    OrgStats(Box<OrganizationStats>),
    Value(Value),
}

impl From<Event> for Record {
    fn from(value: Event) -> Self {
        Record::Event(Box::new(value))
    }
}

impl From<Issue> for Record {
    fn from(value: Issue) -> Self {
        Record::Issue(Box::new(value))
    }
}

impl From<Project> for Record {
    fn from(value: Project) -> Self {
        Record::Project(Box::new(value))
    }
}

impl From<Organization> for Record {
    fn from(value: Organization) -> Self {
        Record::Organization(Box::new(value))
    }
}

impl From<OrganizationStats> for Record {
    fn from(value: OrganizationStats) -> Self {
        Record::OrgStats(Box::new(value))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::Value(value)
    }
}

impl Record {
    fn as_event(&self) -> Option<&Event> {
        match self {
            Record::Event(event) => Some(event),
            _ => None,
        }
    }

    fn as_issue(&self) -> Option<&Issue> {
        match self {
            Record::Issue(issue) => Some(issue),
            _ => None,
        }
    }

    fn as_project(&self) -> Option<&Project> {
        match self {
            Record::Project(project) => Some(project),
            _ => None,
        }
    }
}

/// Input of [`Formatter::format_generic`].
#[derive(Debug, Clone, Copy)]
pub enum Generic<'a> {
    Item(&'a Record),
    List(&'a [Record]),
}

/// What a command hands to [`render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Record(Record),
    Records(Vec<Record>),
}

impl Output {
    pub fn item(record: impl Into<Record>) -> Self {
        Output::Record(record.into())
    }

    pub fn list<T: Into<Record>>(items: Vec<T>) -> Self {
        Output::Records(items.into_iter().map(Into::into).collect())
    }
}

/// A single known record goes to its typed view; anything else to the
/// generic one.
pub fn render(formatter: &mut dyn Formatter, output: &Output) -> Result<()> {
    match output {
        Output::Record(record) => render_record(formatter, record),
        Output::Records(records) => render_records(formatter, records),
    }
}

fn render_record(formatter: &mut dyn Formatter, record: &Record) -> Result<()> {
    match record {
        Record::Event(event) => formatter.format_event(event),
        Record::Issue(issue) => formatter.format_issue(issue),
        Record::Project(project) => formatter.format_project(project),
        Record::OrgStats(stats) => formatter.format_org_stats(stats),
        Record::Organization(_) | Record::Value(_) => formatter.format_generic(Generic::Item(record)),
    }
}

/// A list whose items are all one known kind goes to the typed list method;
/// empty and mixed lists take the generic path.
fn render_records(formatter: &mut dyn Formatter, records: &[Record]) -> Result<()> {
    if !records.is_empty() {
        if let Some(events) = all_of(records, Record::as_event) {
            return formatter.format_events(&events);
        }
        if let Some(issues) = all_of(records, Record::as_issue) {
            return formatter.format_issues(&issues);
        }
        if let Some(projects) = all_of(records, Record::as_project) {
            return formatter.format_projects(&projects);
        }
    }
    formatter.format_generic(Generic::List(records))
}

fn all_of<T: Clone>(records: &[Record], pick: fn(&Record) -> Option<&T>) -> Option<Vec<T>> {
    records.iter().map(|r| pick(r).cloned()).collect()
}

pub(crate) const EVENT_COLUMNS: [&str; 7] = [
    "ID",
    "Title",
    "Type",
    "Platform",
    "Project ID",
    "Date",
    "Environment",
];
pub(crate) const ISSUE_COLUMNS: [&str; 8] = [
    "ID",
    "Title",
    "Level",
    "Status",
    "Count",
    "Users",
    "Last Seen",
    "Project",
];
pub(crate) const PROJECT_COLUMNS: [&str; 6] =
    ["Slug", "Name", "Platform", "Organization", "Status", "Created"];

pub(crate) const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP).to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Scalar rendering of an arbitrary JSON value; containers stay compact JSON.
pub(crate) fn value_to_str(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_format_names() {
        for name in OutputFormat::NAMES {
            let format: OutputFormat = name.parse().unwrap();
            assert_eq!(format.as_str(), name);
        }
    }

    #[test]
    fn rejects_unknown_format_before_rendering() {
        let mut buf = Vec::new();
        let err = formatter("xml", &mut buf).err().unwrap();

        assert!(matches!(err, Error::UnsupportedFormat(ref name) if name == "xml"));
        assert_eq!(err.to_string(), "unsupported format: xml");
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_lists_are_never_blank() {
        for format in OutputFormat::NAMES {
            let rendered = [
                render_with(format, |f| f.format_events(&[])),
                render_with(format, |f| f.format_issues(&[])),
                render_with(format, |f| f.format_projects(&[])),
                render_to_string(format, &Output::Records(vec![])),
            ];
            for output in rendered {
                assert!(!output.trim().is_empty(), "{format} rendered nothing");
            }
        }
        assert_eq!(render_with("json", |f| f.format_events(&[])).trim(), "[]");
        assert_eq!(render_with("text", |f| f.format_issues(&[])), "No issues found\n");
        assert_eq!(render_to_string("json", &Output::list(Vec::<Event>::new())).trim(), "[]");
    }

    #[test]
    fn single_records_use_typed_views() {
        assert!(render_to_string("text", &Output::item(issue())).starts_with("Issue "));
        assert!(render_to_string("text", &Output::item(project())).contains("Backend services"));
    }

    #[test]
    fn homogeneous_records_use_typed_list_view() {
        let records: Vec<Record> = vec![event().into(), event().into()];
        let rendered = render_to_string("text", &Output::Records(records));

        assert!(rendered.starts_with("Events (2 total):"));
    }

    #[test]
    fn mixed_records_fall_back_to_positional_listing() {
        let records: Vec<Record> = vec![event().into(), json!({"detail": "oops"}).into()];
        let rendered = render_to_string("text", &Output::Records(records));

        assert!(rendered.starts_with("Data (2 items):"));
        assert!(rendered.contains("1. "));
        assert!(rendered.contains("2. "));
    }

    #[test]
    fn single_value_record_uses_generic_view() {
        let record = Record::Value(json!({"detail": "Authentication credentials were not provided."}));
        let rendered = render_to_string("markdown", &Output::Record(record));

        assert!(rendered.starts_with("# Data"));
        assert!(rendered.contains("**detail**: Authentication credentials were not provided."));
    }

    #[test]
    fn json_rendering_round_trips() {
        let issue = issue();
        let rendered = render_to_string("json", &Output::item(issue.clone()));
        let decoded: Issue = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, issue);

        let event = event();
        let rendered = render_to_string("json", &Output::list(vec![event.clone()]));
        let decoded: Vec<Event> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, vec![event]);

        let stats = stats(2);
        let rendered = render_to_string("json", &Output::item(stats.clone()));
        let decoded: OrganizationStats = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, stats);

        let project = project();
        let rendered = render_to_string("json", &Output::list(vec![project.clone()]));
        let decoded: Vec<Project> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, vec![project.clone()]);

        let organization = project.organization;
        let rendered = render_to_string("json", &Output::item(organization.clone()));
        let decoded: Organization = serde_json::from_str(&rendered).unwrap();
        assert_eq!(decoded, organization);
    }

    #[test]
    fn table_and_markdown_share_list_columns() {
        let table = render_to_string("table", &Output::list(vec![issue()]));
        let markdown = render_to_string("markdown", &Output::list(vec![issue()]));

        for column in ISSUE_COLUMNS {
            assert!(table.contains(&column.to_uppercase()), "table lacks {column}");
            assert!(markdown.contains(&format!("| {column} |")), "markdown lacks {column}");
        }
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate("ZeroDivisionError: division", 10), "ZeroDiv...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
