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

use super::{Query, list, single};
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::models::{OrganizationStats, Project};
use crate::pagination::Page;

/// Filters for the `stats-summary` endpoint. `field` is required.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// `sum(quantity)` or `sum(times_seen)`.
    pub field: String,
    pub stats_period: String,
    pub interval: String,
    pub start: String,
    pub end: String,
    pub project: Vec<String>,
    pub category: Vec<String>,
    pub outcome: Vec<String>,
    pub reason: Vec<String>,
    pub download: bool,
}

pub struct OrganizationsApi<'a> {
    client: &'a mut ApiClient,
}

impl<'a> OrganizationsApi<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        Self { client }
    }

    pub fn list_projects(&mut self, org: &str, cursor: Option<&str>) -> Result<Page<Project>> {
        let mut query = Query::new();
        query.cursor(cursor);
        list(
            self.client,
            &format!("/organizations/{org}/projects/"),
            &query,
        )
    }

    /// Fails with [`Error::Validation`] before sending anything when
    /// `opts.field` is empty.
    pub fn stats(&mut self, org: &str, opts: &StatsOptions) -> Result<OrganizationStats> {
        if opts.field.trim().is_empty() {
            return Err(Error::validation("field parameter is required"));
        }

        let mut query = Query::new();
        query
            .set("field", &opts.field)
            .set("statsPeriod", &opts.stats_period)
            .set("interval", &opts.interval)
            .set("start", &opts.start)
            .set("end", &opts.end)
            .each("project", &opts.project)
            .each("category", &opts.category)
            .each("outcome", &opts.outcome)
            .each("reason", &opts.reason)
            .flag("download", opts.download);
        single(
            self.client,
            &format!("/organizations/{org}/stats-summary/"),
            &query,
        )
    }
}
