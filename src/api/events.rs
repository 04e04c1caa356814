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
use crate::models::{Event, Issue};
use crate::pagination::Page;

#[derive(Debug, Clone, Default)]
pub struct ListProjectEventsOptions {
    pub stats_period: String,
    pub start: String,
    pub end: String,
    pub full: bool,
    pub sample: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListIssueEventsOptions {
    pub start: String,
    pub end: String,
    pub stats_period: String,
    pub environment: Vec<String>,
    pub full: bool,
    pub sample: bool,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListIssuesOptions {
    pub environment: Vec<String>,
    pub project: Vec<String>,
    pub stats_period: String,
    pub start: String,
    pub end: String,
    pub query: String,
    pub sort: String,
    /// Sent only when positive.
    pub limit: u32,
}

#[derive(Debug, Clone, Default)]
pub struct GetIssueEventOptions {
    pub environment: Vec<String>,
}

/// Events and issues.
pub struct EventsApi<'a> {
    client: &'a mut ApiClient,
}

impl<'a> EventsApi<'a> {
    pub fn new(client: &'a mut ApiClient) -> Self {
        Self { client }
    }

    pub fn list_project_events(
        &mut self,
        org: &str,
        project: &str,
        opts: &ListProjectEventsOptions,
        cursor: Option<&str>,
    ) -> Result<Page<Event>> {
        let mut query = Query::new();
        query
            .set("statsPeriod", &opts.stats_period)
            .set("start", &opts.start)
            .set("end", &opts.end)
            .flag("full", opts.full)
            .flag("sample", opts.sample)
            .cursor(cursor);
        list(
            self.client,
            &format!("/projects/{org}/{project}/events/"),
            &query,
        )
    }

    pub fn list_issue_events(
        &mut self,
        org: &str,
        issue_id: &str,
        opts: &ListIssueEventsOptions,
        cursor: Option<&str>,
    ) -> Result<Page<Event>> {
        let mut query = Query::new();
        query
            .set("start", &opts.start)
            .set("end", &opts.end)
            .set("statsPeriod", &opts.stats_period)
            .each("environment", &opts.environment)
            .flag("full", opts.full)
            .flag("sample", opts.sample)
            .set("query", &opts.query)
            .cursor(cursor);
        list(
            self.client,
            &format!("/organizations/{org}/issues/{issue_id}/events/"),
            &query,
        )
    }

    pub fn list_issues(
        &mut self,
        org: &str,
        opts: &ListIssuesOptions,
        cursor: Option<&str>,
    ) -> Result<Page<Issue>> {
        let mut query = Query::new();
        query
            .each("environment", &opts.environment)
            .each("project", &opts.project)
            .set("statsPeriod", &opts.stats_period)
            .set("start", &opts.start)
            .set("end", &opts.end)
            .set("query", &opts.query)
            .set("sort", &opts.sort);
        if opts.limit > 0 {
            query.set("limit", &opts.limit.to_string());
        }
        query.cursor(cursor);
        list(
            self.client,
            &format!("/organizations/{org}/issues/"),
            &query,
        )
    }

    pub fn get_project_event(&mut self, org: &str, project: &str, event_id: &str) -> Result<Event> {
        single(
            self.client,
            &format!("/projects/{org}/{project}/events/{event_id}/"),
            &Query::new(),
        )
    }

    pub fn get_issue(&mut self, org: &str, issue_id: &str) -> Result<Issue> {
        single(
            self.client,
            &format!("/organizations/{org}/issues/{issue_id}/"),
            &Query::new(),
        )
    }

    /// `event_id` may also be `latest`, `oldest` or `recommended`.
    pub fn get_issue_event(
        &mut self,
        org: &str,
        issue_id: &str,
        event_id: &str,
        opts: &GetIssueEventOptions,
    ) -> Result<Event> {
        let mut query = Query::new();
        query.each("environment", &opts.environment);
        single(
            self.client,
            &format!("/organizations/{org}/issues/{issue_id}/events/{event_id}/"),
            &query,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.base_url(), "test-token").unwrap()
    }

    #[test]
    fn list_project_events_sends_filters_and_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/projects/acme/backend/events/")
                .query_param("statsPeriod", "24h")
                .query_param("full", "true")
                .query_param("cursor", "0:100:0");
            then.status(200)
                .header(
                    "Link",
                    r#"<https://sentry.io/api/0/projects/acme/backend/events/?cursor=0:200:0>; rel="next"; results="true""#,
                )
                .json_body(json!([
                    {"id": "1", "eventID": "a", "title": "first"},
                    {"id": "2", "eventID": "b", "title": "second"}
                ]));
        });

        let mut client = client(&server);
        let opts = ListProjectEventsOptions {
            stats_period: "24h".into(),
            full: true,
            ..Default::default()
        };
        let page = EventsApi::new(&mut client)
            .list_project_events("acme", "backend", &opts, Some("0:100:0"))
            .unwrap();

        mock.assert();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].event_id, "b");
        let pagination = page.pagination.unwrap();
        assert!(pagination.has_next);
        assert_eq!(pagination.next_cursor, "0:200:0");
    }

    #[test]
    fn list_issues_sends_repeated_filters_and_limit() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/organizations/acme/issues/")
                .query_param("environment", "production")
                .query_param("environment", "staging")
                .query_param("project", "5")
                .query_param("query", "is:unresolved")
                .query_param("limit", "25");
            then.status(200).json_body(json!([
                {"id": "10", "shortId": "BACKEND-1A", "title": "Boom", "count": "3", "userCount": 1}
            ]));
        });

        let mut client = client(&server);
        let opts = ListIssuesOptions {
            environment: vec!["production".into(), "staging".into()],
            project: vec!["5".into()],
            query: "is:unresolved".into(),
            limit: 25,
            ..Default::default()
        };
        let page = EventsApi::new(&mut client)
            .list_issues("acme", &opts, None)
            .unwrap();

        mock.assert();
        assert_eq!(page.items[0].short_id, "BACKEND-1A");
        assert!(!page.pagination.unwrap().has_next);
    }

    #[test]
    fn list_issue_events_hits_issue_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/organizations/acme/issues/42/events/")
                .query_param("query", "user.email:jane@example.com")
                .query_param("sample", "true");
            then.status(200).json_body(json!([]));
        });

        let mut client = client(&server);
        let opts = ListIssueEventsOptions {
            query: "user.email:jane@example.com".into(),
            sample: true,
            ..Default::default()
        };
        let page = EventsApi::new(&mut client)
            .list_issue_events("acme", "42", &opts, None)
            .unwrap();

        mock.assert();
        assert!(page.items.is_empty());
    }

    #[test]
    fn get_issue_event_accepts_symbolic_ids() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/organizations/acme/issues/42/events/recommended/")
                .query_param("environment", "production");
            then.status(200)
                .json_body(json!({"id": "7", "eventID": "abc", "title": "Boom", "groupID": "42"}));
        });

        let mut client = client(&server);
        let opts = GetIssueEventOptions {
            environment: vec!["production".into()],
        };
        let event = EventsApi::new(&mut client)
            .get_issue_event("acme", "42", "recommended", &opts)
            .unwrap();

        mock.assert();
        assert_eq!(event.group_id, "42");
    }

    #[test]
    fn get_issue_and_project_event() {
        let server = MockServer::start();
        let issue_mock = server.mock(|when, then| {
            when.method(GET).path("/organizations/acme/issues/42/");
            then.status(200)
                .json_body(json!({"id": "42", "shortId": "BACKEND-1A", "status": "unresolved"}));
        });
        let event_mock = server.mock(|when, then| {
            when.method(GET).path("/projects/acme/backend/events/abc/");
            then.status(200).json_body(json!({"id": "7", "eventID": "abc"}));
        });

        let mut client = client(&server);
        let mut api = EventsApi::new(&mut client);
        let issue = api.get_issue("acme", "42").unwrap();
        let event = api.get_project_event("acme", "backend", "abc").unwrap();

        issue_mock.assert();
        event_mock.assert();
        assert_eq!(issue.status, "unresolved");
        assert_eq!(event.event_id, "abc");
    }

    #[test]
    fn not_found_surfaces_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/organizations/acme/issues/404/");
            then.status(404).body(r#"{"detail":"The requested resource does not exist"}"#);
        });

        let mut client = client(&server);
        let err = EventsApi::new(&mut client)
            .get_issue("acme", "404")
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("does not exist"));
    }
}
