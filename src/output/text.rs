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

use super::{Describe, Formatter, Generic, timestamp, value_to_str};
use crate::error::Result;
use crate::models::{Event, Issue, OrganizationStats, Project};

const MAX_ENTRIES: usize = 3;
const MAX_STATS_PROJECTS: usize = 5;

/// Plain `Label: value` lines, one numbered block per list item.
pub struct TextFormatter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> TextFormatter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }
}

impl Formatter for TextFormatter<'_> {
    fn format_event(&mut self, event: &Event) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "Event #{}", event.id)?;
        writeln!(out, "Event ID: {}", event.event_id)?;
        writeln!(out, "Title: {}", event.title)?;
        writeln!(out, "Message: {}", event.message)?;
        writeln!(out, "Type: {}", event.kind)?;
        writeln!(out, "Platform: {}", event.platform)?;
        writeln!(out, "Project ID: {}", event.project_id)?;
        writeln!(out, "Date Created: {}", timestamp(&event.date_created))?;
        writeln!(out, "Date Received: {}", timestamp(&event.date_received))?;
        writeln!(out, "Size: {} bytes", event.size)?;

        for (label, value) in [
            ("Group ID", &event.group_id),
            ("Logger", &event.logger),
            ("Culprit", &event.culprit),
            ("Environment", &event.environment),
        ] {
            if !value.is_empty() {
                writeln!(out, "{label}: {value}")?;
            }
        }

        if !event.entries.is_empty() {
            writeln!(out, "\nEntries:")?;
            for (i, entry) in event.entries.iter().take(MAX_ENTRIES).enumerate() {
                writeln!(out, "  {}. Type: {}", i + 1, entry.kind)?;
            }
        }

        writeln!(out)?;
        Ok(())
    }

    fn format_events(&mut self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            writeln!(self.out, "No events found")?;
            return Ok(());
        }

        writeln!(self.out, "Events ({} total):\n", events.len())?;
        for (i, event) in events.iter().enumerate() {
            writeln!(self.out, "{}. Event #{}", i + 1, event.event_id)?;
            writeln!(self.out, "   Title: {}", event.title)?;
            writeln!(
                self.out,
                "   Type: {} | Platform: {} | Project ID: {}",
                event.kind, event.platform, event.project_id
            )?;
            writeln!(
                self.out,
                "   Date: {} | Environment: {}",
                event.date_created.format("%Y-%m-%d %H:%M"),
                event.environment
            )?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn format_issue(&mut self, issue: &Issue) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "Issue #{} ({})", issue.id, issue.short_id)?;
        writeln!(out, "Title: {}", issue.title)?;
        writeln!(out, "Level: {}", issue.level)?;
        if issue.substatus.is_empty() {
            writeln!(out, "Status: {}", issue.status)?;
        } else {
            writeln!(out, "Status: {} ({})", issue.status, issue.substatus)?;
        }
        if !issue.priority.is_empty() {
            writeln!(out, "Priority: {}", issue.priority)?;
        }
        writeln!(out, "Platform: {}", issue.platform)?;
        writeln!(out, "Project: {} ({})", issue.project.name, issue.project.slug)?;
        writeln!(out, "Count: {}", issue.count)?;
        writeln!(out, "User Count: {}", issue.user_count)?;
        writeln!(out, "First Seen: {}", timestamp(&issue.first_seen))?;
        writeln!(out, "Last Seen: {}", timestamp(&issue.last_seen))?;
        if !issue.culprit.is_empty() {
            writeln!(out, "Culprit: {}", issue.culprit)?;
        }
        if !issue.logger.is_empty() {
            writeln!(out, "Logger: {}", issue.logger)?;
        }
        writeln!(
            out,
            "Public: {} | Bookmarked: {} | Subscribed: {}",
            issue.is_public, issue.is_bookmarked, issue.is_subscribed
        )?;
        if !issue.permalink.is_empty() {
            writeln!(out, "Permalink: {}", issue.permalink)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn format_issues(&mut self, issues: &[Issue]) -> Result<()> {
        if issues.is_empty() {
            writeln!(self.out, "No issues found")?;
            return Ok(());
        }

        writeln!(self.out, "Issues ({} total):\n", issues.len())?;
        for (i, issue) in issues.iter().enumerate() {
            writeln!(self.out, "{}. Issue #{}", i + 1, issue.short_id)?;
            writeln!(self.out, "   Title: {}", issue.title)?;
            writeln!(
                self.out,
                "   Level: {} | Status: {} | Count: {}",
                issue.level, issue.status, issue.count
            )?;
            writeln!(
                self.out,
                "   Project: {} | Users: {}",
                issue.project.slug, issue.user_count
            )?;
            writeln!(
                self.out,
                "   Last Seen: {}",
                issue.last_seen.format("%Y-%m-%d %H:%M")
            )?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn format_project(&mut self, project: &Project) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "Project: {}", project.name)?;
        writeln!(out, "ID: {}", project.id)?;
        writeln!(out, "Slug: {}", project.slug)?;
        writeln!(out, "Platform: {}", project.platform)?;
        writeln!(
            out,
            "Organization: {} ({})",
            project.organization.name, project.organization.slug
        )?;
        writeln!(out, "Status: {}", project.status)?;
        writeln!(out, "Date Created: {}", timestamp(&project.date_created))?;
        writeln!(
            out,
            "Public: {} | Bookmarked: {}",
            project.is_public, project.is_bookmarked
        )?;
        writeln!(out)?;
        Ok(())
    }

    fn format_projects(&mut self, projects: &[Project]) -> Result<()> {
        if projects.is_empty() {
            writeln!(self.out, "No projects found")?;
            return Ok(());
        }

        writeln!(self.out, "Projects ({} total):\n", projects.len())?;
        for (i, project) in projects.iter().enumerate() {
            writeln!(self.out, "{}. {} ({})", i + 1, project.name, project.slug)?;
            writeln!(
                self.out,
                "   Platform: {} | Organization: {}",
                project.platform, project.organization.slug
            )?;
            writeln!(
                self.out,
                "   Status: {} | Created: {}",
                project.status,
                project.date_created.format("%Y-%m-%d")
            )?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn format_org_stats(&mut self, stats: &OrganizationStats) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "Organization Statistics")?;
        writeln!(out, "======================\n")?;
        writeln!(out, "Period Start: {}", timestamp(&stats.start))?;
        writeln!(out, "Period End: {}", timestamp(&stats.end))?;
        writeln!(out, "Total Sum: {}", stats.totals.sum)?;
        writeln!(out, "Times Seen: {}", stats.totals.times_seen)?;

        if !stats.projects.is_empty() {
            writeln!(out, "\nProjects ({}):", stats.projects.len())?;
            for (i, project) in stats.projects.iter().take(MAX_STATS_PROJECTS).enumerate() {
                writeln!(
                    out,
                    "  {}. {} ({})",
                    i + 1,
                    project.slug,
                    value_to_str(&project.id)
                )?;
            }
            if stats.projects.len() > MAX_STATS_PROJECTS {
                writeln!(
                    out,
                    "... and {} more projects",
                    stats.projects.len() - MAX_STATS_PROJECTS
                )?;
            }
        }

        writeln!(out)?;
        Ok(())
    }

    fn format_generic(&mut self, data: Generic<'_>) -> Result<()> {
        match data {
            Generic::Item(record) => {
                let name = record.type_name();
                writeln!(self.out, "{name}:")?;
                writeln!(self.out, "{}", "=".repeat(name.len() + 1))?;
                for (label, value) in record.fields() {
                    writeln!(self.out, "{label}: {value}")?;
                }
            }
            Generic::List([]) => {
                writeln!(self.out, "No data found")?;
                return Ok(());
            }
            Generic::List(records) => {
                writeln!(self.out, "Data ({} items):\n", records.len())?;
                for (i, record) in records.iter().enumerate() {
                    writeln!(self.out, "{}. {}", i + 1, record.summary())?;
                }
            }
        }
        writeln!(self.out)?;
        Ok(())
    }
}
