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

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};

use super::{
    Describe, EVENT_COLUMNS, Formatter, Generic, ISSUE_COLUMNS, PROJECT_COLUMNS, timestamp,
    truncate,
};
use crate::error::Result;
use crate::models::{Event, Issue, OrganizationStats, Project};

const TITLE_WIDTH: usize = 30;
const PROJECT_NAME_WIDTH: usize = 25;

/// Bordered tables with upper-case headers.
pub struct TableFormatter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> TableFormatter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }

    fn print(&mut self, table: &Table) -> Result<()> {
        writeln!(self.out, "{table}")?;
        Ok(())
    }

    fn empty(&mut self, what: &str) -> Result<()> {
        writeln!(self.out, "No {what} found")?;
        Ok(())
    }

    fn key_value(&mut self, headers: [&str; 2], rows: Vec<(String, String)>) -> Result<()> {
        let mut table = new_table(&headers);
        for (label, value) in rows {
            table.add_row([Cell::new(label), Cell::new(value)]);
        }
        self.print(&table)
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(headers.iter().map(|h| Cell::new(h.to_uppercase())));
    table
}

impl Formatter for TableFormatter<'_> {
    fn format_event(&mut self, event: &Event) -> Result<()> {
        self.key_value(["Field", "Value"], event.fields())
    }

    fn format_events(&mut self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return self.empty("events");
        }
        let mut table = new_table(&EVENT_COLUMNS);
        for event in events {
            table.add_row([
                event.event_id.clone(),
                truncate(&event.title, TITLE_WIDTH),
                event.kind.clone(),
                event.platform.clone(),
                event.project_id.clone(),
                event.date_created.format("%Y-%m-%d %H:%M").to_string(),
                event.environment.clone(),
            ]);
        }
        self.print(&table)
    }

    fn format_issue(&mut self, issue: &Issue) -> Result<()> {
        self.key_value(["Field", "Value"], issue.fields())
    }

    fn format_issues(&mut self, issues: &[Issue]) -> Result<()> {
        if issues.is_empty() {
            return self.empty("issues");
        }
        let mut table = new_table(&ISSUE_COLUMNS);
        for issue in issues {
            table.add_row([
                issue.short_id.clone(),
                truncate(&issue.title, TITLE_WIDTH),
                issue.level.clone(),
                issue.status.clone(),
                issue.count.clone(),
                issue.user_count.to_string(),
                issue.last_seen.format("%m-%d %H:%M").to_string(),
                issue.project.slug.clone(),
            ]);
        }
        self.print(&table)
    }

    fn format_project(&mut self, project: &Project) -> Result<()> {
        self.key_value(["Field", "Value"], project.fields())
    }

    fn format_projects(&mut self, projects: &[Project]) -> Result<()> {
        if projects.is_empty() {
            return self.empty("projects");
        }
        let mut table = new_table(&PROJECT_COLUMNS);
        for project in projects {
            table.add_row([
                project.slug.clone(),
                truncate(&project.name, PROJECT_NAME_WIDTH),
                project.platform.clone(),
                project.organization.slug.clone(),
                project.status.clone(),
                project.date_created.format("%Y-%m-%d").to_string(),
            ]);
        }
        self.print(&table)
    }

    fn format_org_stats(&mut self, stats: &OrganizationStats) -> Result<()> {
        let rows = vec![
            ("Start Time".to_string(), timestamp(&stats.start)),
            ("End Time".to_string(), timestamp(&stats.end)),
            ("Total Sum".to_string(), stats.totals.sum.to_string()),
            ("Times Seen".to_string(), stats.totals.times_seen.to_string()),
        ];
        self.key_value(["Metric", "Value"], rows)
    }

    fn format_generic(&mut self, data: Generic<'_>) -> Result<()> {
        match data {
            Generic::Item(record) => self.key_value(["Field", "Value"], record.fields()),
            Generic::List([]) => self.empty("data"),
            Generic::List(records) => {
                let rows = records
                    .iter()
                    .enumerate()
                    .map(|(i, record)| (i.to_string(), record.summary()))
                    .collect();
                self.key_value(["Index", "Value"], rows)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::output::{Output, Record, fixtures::*};
    use serde_json::json;

    #[test]
    fn single_event_is_a_field_value_table() {
        let rendered = render_to_string("table", &Output::item(event()));

        assert!(rendered.contains("FIELD"));
        assert!(rendered.contains("VALUE"));
        assert!(rendered.contains("9fac2ceed9344f2bbfdd1fdacb0ed9b1"));
        assert!(rendered.contains("2025-08-30 10:15:00"));
        assert!(rendered.contains("Environment"));
    }

    #[test]
    fn event_list_truncates_titles() {
        let mut long = event();
        long.title = "A".repeat(40);
        let rendered = render_to_string("table", &Output::list(vec![long]));

        assert!(rendered.contains(&format!("{}...", "A".repeat(27))));
        assert!(!rendered.contains(&"A".repeat(28)));
        assert!(rendered.contains("PROJECT ID"));
        assert!(rendered.contains("2025-08-30 10:15"));
    }

    #[test]
    fn project_list_truncates_names() {
        let rendered = render_to_string("table", &Output::list(vec![project()]));

        assert!(rendered.contains("Backend services for t..."));
        assert!(rendered.contains("acme"));
        assert!(rendered.contains("2025-08-30"));
    }

    #[test]
    fn stats_table_lists_totals() {
        let rendered = render_to_string("table", &Output::item(stats(3)));

        assert!(rendered.contains("METRIC"));
        assert!(rendered.contains("Total Sum"));
        assert!(rendered.contains("1000"));
        assert!(rendered.contains("Times Seen"));
    }

    #[test]
    fn empty_lists_print_a_notice() {
        assert_eq!(render_with("table", |f| f.format_events(&[])), "No events found\n");
        assert_eq!(render_with("table", |f| f.format_projects(&[])), "No projects found\n");
        assert_eq!(render_to_string("table", &Output::Records(vec![])), "No data found\n");
    }

    #[test]
    fn unknown_list_is_indexed() {
        let records = vec![Record::Value(json!("first")), Record::from(issue())];
        let rendered = render_to_string("table", &Output::Records(records));

        assert!(rendered.contains("INDEX"));
        assert!(rendered.contains("first"));
        assert!(rendered.contains("Issue BACKEND-1A"));
    }
}
