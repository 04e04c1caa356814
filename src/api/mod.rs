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

//! Endpoint accessors: path construction and query parameters over
//! [`ApiClient`].

mod events;
mod organizations;
mod projects;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::Result;
use crate::pagination::Page;

pub use events::{
    EventsApi, GetIssueEventOptions, ListIssueEventsOptions, ListIssuesOptions,
    ListProjectEventsOptions,
};
pub use organizations::{OrganizationsApi, StatsOptions};
pub use projects::ProjectsApi;

/// Query parameters in insertion order. Empty strings and unset flags are
/// never added; list values become repeated keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn flag(&mut self, key: &'static str, enabled: bool) -> &mut Self {
        if enabled {
            self.0.push((key, "true".to_string()));
        }
        self
    }

    pub(crate) fn each(&mut self, key: &'static str, values: &[String]) -> &mut Self {
        for value in values {
            self.0.push((key, value.clone()));
        }
        self
    }

    pub(crate) fn cursor(&mut self, cursor: Option<&str>) -> &mut Self {
        self.set("cursor", cursor.unwrap_or_default())
    }

    pub(crate) fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

fn list<T: DeserializeOwned>(
    client: &mut ApiClient,
    endpoint: &str,
    query: &Query,
) -> Result<Page<T>> {
    let (items, pagination) = client.get_json(endpoint, query.pairs())?;
    Ok(Page::new(items, pagination))
}

fn single<T: DeserializeOwned>(client: &mut ApiClient, endpoint: &str, query: &Query) -> Result<T> {
    let (item, _) = client.get_json(endpoint, query.pairs())?;
    Ok(item)
}
