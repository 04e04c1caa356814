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

use std::io::{self, Write};

use serde::Serialize;

use super::{Formatter, Generic};
use crate::error::Result;
use crate::models::{Event, Issue, OrganizationStats, Project};

/// Pretty-printed JSON with two-space indentation, no per-type layout.
pub struct JsonFormatter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> JsonFormatter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }

    fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value).map_err(io::Error::from)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl Formatter for JsonFormatter<'_> {
    fn format_event(&mut self, event: &Event) -> Result<()> {
        self.write(event)
    }

    fn format_events(&mut self, events: &[Event]) -> Result<()> {
        self.write(events)
    }

    fn format_issue(&mut self, issue: &Issue) -> Result<()> {
        self.write(issue)
    }

    fn format_issues(&mut self, issues: &[Issue]) -> Result<()> {
        self.write(issues)
    }

    fn format_project(&mut self, project: &Project) -> Result<()> {
        self.write(project)
    }

    fn format_projects(&mut self, projects: &[Project]) -> Result<()> {
        self.write(projects)
    }

    fn format_org_stats(&mut self, stats: &OrganizationStats) -> Result<()> {
        self.write(stats)
    }

    fn format_generic(&mut self, data: Generic<'_>) -> Result<()> {
        match data {
            Generic::Item(record) => self.write(record),
            Generic::List(records) => self.write(records),
        }
    }
}
