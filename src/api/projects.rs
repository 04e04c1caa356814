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
use crate::error::Result;
use crate::models::Project;
use crate::pagination::Page;

pub struct ProjectsApi<'a> {
    client: &'a mut ApiClient,
}

impl<'a> ProjectsApi<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        Self { client }
    }

    /// Every project the token can see, across organizations.
    pub fn list_projects(&mut self, cursor: Option<&str>) -> Result<Page<Project>> {
        let mut query = Query::new();
        query.cursor(cursor);
        list(self.client, "/projects/", &query)
    }

    pub fn get_project(&mut self, org: &str, project: &str) -> Result<Project> {
        single(
            self.client,
            &format!("/projects/{org}/{project}/"),
            &Query::new(),
        )
    }
}
