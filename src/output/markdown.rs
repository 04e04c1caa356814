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

use std::io::Write;

use super::{
    Describe, EVENT_COLUMNS, Formatter, Generic, ISSUE_COLUMNS, PROJECT_COLUMNS, timestamp,
    truncate, value_to_str,
};
use crate::error::Result;
use crate::models::{Event, Issue, OrganizationStats, Project};

const EVENT_TITLE_WIDTH: usize = 20;
const ISSUE_TITLE_WIDTH: usize = 25;
const PROJECT_NAME_WIDTH: usize = 20;
const MAX_ENTRIES: usize = 5;
const MAX_STATS_PROJECTS: usize = 10;

/// GitHub-flavoured markdown: headings, bold labels, pipe tables.
pub struct MarkdownFormatter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> MarkdownFormatter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }

    fn table_header(&mut self, columns: &[&str]) -> Result<()> {
        writeln!(self.out, "| {} |", columns.join(" | "))?;
        writeln!(self.out, "|{}", "----|".repeat(columns.len()))?;
        Ok(())
    }

    fn table_row(&mut self, cells: &[String]) -> Result<()> {
        writeln!(self.out, "| {} |", cells.join(" | "))?;
        Ok(())
    }

    fn empty(&mut self, heading: &str, what: &str) -> Result<()> {
        writeln!(self.out, "# {heading}\n\nNo {what} found.")?;
        Ok(())
    }
}

/// Backslash-escape characters that would break a table cell or inline
/// formatting.
pub(crate) fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '|' | '*' | '_' | '`' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Formatter for MarkdownFormatter<'_> {
    fn format_event(&mut self, event: &Event) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "# Event Details\n")?;
        writeln!(out, "**ID**: {}  ", event.id)?;
        writeln!(out, "**Event ID**: {}  ", event.event_id)?;
        writeln!(out, "**Title**: {}  ", event.title)?;
        writeln!(out, "**Message**: {}  ", event.message)?;
        writeln!(out, "**Type**: {}  ", event.kind)?;
        writeln!(out, "**Platform**: {}  ", event.platform)?;
        writeln!(out, "**Project ID**: {}  ", event.project_id)?;
        writeln!(out, "**Date Created**: {}  ", timestamp(&event.date_created))?;
        writeln!(out, "**Date Received**: {}  ", timestamp(&event.date_received))?;
        writeln!(out, "**Size**: {} bytes  ", event.size)?;

        for (label, value) in [
            ("Group ID", &event.group_id),
            ("Logger", &event.logger),
            ("Culprit", &event.culprit),
            ("Environment", &event.environment),
        ] {
            if !value.is_empty() {
                writeln!(out, "**{label}**: {value}  ")?;
            }
        }

        if !event.entries.is_empty() {
            writeln!(out, "\n## Entries\n")?;
            for (i, entry) in event.entries.iter().take(MAX_ENTRIES).enumerate() {
                writeln!(out, "{}. **Type**: {}", i + 1, entry.kind)?;
            }
            if event.entries.len() > MAX_ENTRIES {
                writeln!(
                    out,
                    "... and {} more entries",
                    event.entries.len() - MAX_ENTRIES
                )?;
            }
        }

        writeln!(out)?;
        Ok(())
    }

    fn format_events(&mut self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return self.empty("Events", "events");
        }

        writeln!(self.out, "# Events ({} total)\n", events.len())?;
        self.table_header(&EVENT_COLUMNS)?;
        for event in events {
            self.table_row(&[
                event.event_id.clone(),
                escape(&truncate(&event.title, EVENT_TITLE_WIDTH)),
                event.kind.clone(),
                event.platform.clone(),
                event.project_id.clone(),
                event.date_created.format("%m-%d %H:%M").to_string(),
                event.environment.clone(),
            ])?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn format_issue(&mut self, issue: &Issue) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "# Issue Details\n")?;
        writeln!(out, "**ID**: {} ({})  ", issue.id, issue.short_id)?;
        writeln!(out, "**Title**: {}  ", issue.title)?;
        writeln!(out, "**Level**: {}  ", issue.level)?;
        if issue.substatus.is_empty() {
            writeln!(out, "**Status**: {}  ", issue.status)?;
        } else {
            writeln!(out, "**Status**: {} ({})  ", issue.status, issue.substatus)?;
        }
        if !issue.priority.is_empty() {
            writeln!(out, "**Priority**: {}  ", issue.priority)?;
        }
        writeln!(out, "**Platform**: {}  ", issue.platform)?;
        writeln!(
            out,
            "**Project**: {} ({})  ",
            issue.project.name, issue.project.slug
        )?;
        writeln!(out, "**Count**: {}  ", issue.count)?;
        writeln!(out, "**User Count**: {}  ", issue.user_count)?;
        writeln!(out, "**First Seen**: {}  ", timestamp(&issue.first_seen))?;
        writeln!(out, "**Last Seen**: {}  ", timestamp(&issue.last_seen))?;
        if !issue.culprit.is_empty() {
            writeln!(out, "**Culprit**: {}  ", issue.culprit)?;
        }
        if !issue.logger.is_empty() {
            writeln!(out, "**Logger**: {}  ", issue.logger)?;
        }
        writeln!(
            out,
            "**Public**: {} | **Bookmarked**: {} | **Subscribed**: {}  ",
            issue.is_public, issue.is_bookmarked, issue.is_subscribed
        )?;
        if !issue.permalink.is_empty() {
            writeln!(
                out,
                "**Permalink**: [{0}]({0})  ",
                issue.permalink
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn format_issues(&mut self, issues: &[Issue]) -> Result<()> {
        if issues.is_empty() {
            return self.empty("Issues", "issues");
        }

        writeln!(self.out, "# Issues ({} total)\n", issues.len())?;
        self.table_header(&ISSUE_COLUMNS)?;
        for issue in issues {
            self.table_row(&[
                issue.short_id.clone(),
                escape(&truncate(&issue.title, ISSUE_TITLE_WIDTH)),
                issue.level.clone(),
                issue.status.clone(),
                issue.count.clone(),
                issue.user_count.to_string(),
                issue.last_seen.format("%m-%d %H:%M").to_string(),
                issue.project.slug.clone(),
            ])?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn format_project(&mut self, project: &Project) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "# Project Details\n")?;
        writeln!(out, "**Name**: {}  ", project.name)?;
        writeln!(out, "**ID**: {}  ", project.id)?;
        writeln!(out, "**Slug**: {}  ", project.slug)?;
        writeln!(out, "**Platform**: {}  ", project.platform)?;
        writeln!(
            out,
            "**Organization**: {} ({})  ",
            project.organization.name, project.organization.slug
        )?;
        writeln!(out, "**Status**: {}  ", project.status)?;
        writeln!(out, "**Date Created**: {}  ", timestamp(&project.date_created))?;
        writeln!(
            out,
            "**Public**: {} | **Bookmarked**: {}  ",
            project.is_public, project.is_bookmarked
        )?;
        writeln!(out)?;
        Ok(())
    }

    fn format_projects(&mut self, projects: &[Project]) -> Result<()> {
        if projects.is_empty() {
            return self.empty("Projects", "projects");
        }

        writeln!(self.out, "# Projects ({} total)\n", projects.len())?;
        self.table_header(&PROJECT_COLUMNS)?;
        for project in projects {
            self.table_row(&[
                project.slug.clone(),
                escape(&truncate(&project.name, PROJECT_NAME_WIDTH)),
                project.platform.clone(),
                project.organization.slug.clone(),
                project.status.clone(),
                project.date_created.format("%Y-%m-%d").to_string(),
            ])?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn format_org_stats(&mut self, stats: &OrganizationStats) -> Result<()> {
        writeln!(self.out, "# Organization Statistics\n")?;
        self.table_header(&["Metric", "Value"])?;
        self.table_row(&["Period Start".into(), timestamp(&stats.start)])?;
        self.table_row(&["Period End".into(), timestamp(&stats.end)])?;
        self.table_row(&["Total Sum".into(), stats.totals.sum.to_string()])?;
        self.table_row(&["Times Seen".into(), stats.totals.times_seen.to_string()])?;

        if !stats.projects.is_empty() {
            writeln!(self.out, "\n## Projects ({})\n", stats.projects.len())?;
            self.table_header(&["Project", "ID"])?;
            for project in stats.projects.iter().take(MAX_STATS_PROJECTS) {
                self.table_row(&[escape(&project.slug), value_to_str(&project.id)])?;
            }
            if stats.projects.len() > MAX_STATS_PROJECTS {
                self.table_row(&["...".into(), "...".into()])?;
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    fn format_generic(&mut self, data: Generic<'_>) -> Result<()> {
        match data {
            Generic::Item(record) => {
                writeln!(self.out, "# {}\n", record.type_name())?;
                for (label, value) in record.fields() {
                    writeln!(self.out, "**{label}**: {value}  ")?;
                }
            }
            Generic::List([]) => return self.empty("Data", "data"),
            Generic::List(records) => {
                writeln!(self.out, "# Data ({} items)\n", records.len())?;
                for (i, record) in records.iter().enumerate() {
                    writeln!(self.out, "{}. {}", i + 1, record.summary())?;
                }
            }
        }
        writeln!(self.out)?;
        Ok(())
    }
}
