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

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, LINK, USER_AGENT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://sentry.io/api/0";
pub const USER_AGENT_VALUE: &str = concat!("sentire/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const RELATIVE_LINK_BASE: &str = "http://localhost/";

const HEADER_LIMIT: &str = "X-Sentry-Rate-Limit-Limit";
const HEADER_REMAINING: &str = "X-Sentry-Rate-Limit-Remaining";
const HEADER_RESET: &str = "X-Sentry-Rate-Limit-Reset";
const HEADER_CONCURRENT_LIMIT: &str = "X-Sentry-Rate-Limit-ConcurrentLimit";
const HEADER_CONCURRENT_REMAINING: &str = "X-Sentry-Rate-Limit-ConcurrentRemaining";

/// Rate-limit counters from the most recent response that carried them.
///
/// Each field is overwritten independently; a response that omits a header
/// leaves the previous value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitState {
    pub limit: Option<i64>,
    pub remaining: Option<i64>,
    pub reset: Option<DateTime<Utc>>,
    pub concurrent_limit: Option<i64>,
    pub concurrent_remaining: Option<i64>,
}

impl RateLimitState {
    fn update(&mut self, headers: &HeaderMap) {
        if let Some(value) = header_int(headers, HEADER_LIMIT) {
            self.limit = Some(value);
        }
        if let Some(value) = header_int(headers, HEADER_REMAINING) {
            self.remaining = Some(value);
        }
        if let Some(reset) =
            header_int(headers, HEADER_RESET).and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            self.reset = Some(reset);
        }
        if let Some(value) = header_int(headers, HEADER_CONCURRENT_LIMIT) {
            self.concurrent_limit = Some(value);
        }
        if let Some(value) = header_int(headers, HEADER_CONCURRENT_REMAINING) {
            self.concurrent_remaining = Some(value);
        }
    }
}

fn header_int(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}

/// Absolute targets parse as-is; relative ones resolve against a placeholder
/// origin, since only their query string matters.
fn parse_link_target(target: &str) -> Option<Url> {
    Url::parse(target)
        .ok()
        .or_else(|| Url::parse(RELATIVE_LINK_BASE).ok()?.join(target).ok())
}

/// Cursor metadata derived from one response's `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    pub next_cursor: String,
    pub prev_cursor: String,
    /// Only true when the next link also reported `results="true"`.
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    /// Parse a `Link` header of the form
    /// `<url>; rel="next"; results="true", <url>; rel="previous"; ...`.
    pub fn from_link_header(header: &str) -> Self {
        let mut info = Self::default();
        if header.trim().is_empty() {
            return info;
        }

        for link in header.split(',') {
            let mut parts = link.trim().split(';');
            let Some(target) = parts.next() else {
                continue;
            };
            let target = target.trim().trim_matches(|c| c == '<' || c == '>').trim();
            let Some(url) = parse_link_target(target) else {
                continue;
            };
            let cursor = url
                .query_pairs()
                .find(|(key, _)| key == "cursor")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default();

            let (mut is_next, mut is_prev, mut has_results) = (false, false, false);
            for attr in parts {
                if attr.contains(r#"rel="next""#) {
                    is_next = true;
                } else if attr.contains(r#"rel="previous""#) {
                    is_prev = true;
                }
                if attr.contains(r#"results="true""#) {
                    has_results = true;
                }
            }

            if is_next {
                info.next_cursor = cursor;
                info.has_next = has_results;
            } else if is_prev {
                info.prev_cursor = cursor;
                info.has_prev = true;
            }
        }

        info
    }
}

/// A successful response paired with its pagination metadata.
///
/// The body is consumed by [`ApiClient::decode_body`], which takes the
/// envelope by value.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub pagination: PaginationInfo,
    response: Response,
}

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: String,
    rate_limit: RateLimitState,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: token.to_string(),
            rate_limit: RateLimitState::default(),
        })
    }

    pub fn rate_limit(&self) -> &RateLimitState {
        &self.rate_limit
    }

    /// GET `{base_url}{endpoint}`, with a query string only when `query` has entries.
    /// Repeated keys are sent as repeated parameters.
    pub fn get(&mut self, endpoint: &str, query: &[(&str, String)]) -> Result<ResponseEnvelope> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(Method::GET, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request)
    }

    /// Attach auth and client headers, send, and record rate-limit and
    /// pagination data from the response regardless of its status.
    pub fn execute(&mut self, request: RequestBuilder) -> Result<ResponseEnvelope> {
        let request = request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .build()
            .map_err(Error::Transport)?;

        let method = request.method().clone();
        let url = request.url().clone();
        let response = self.http.execute(request).map_err(Error::Transport)?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "response received");

        self.rate_limit.update(response.headers());
        debug!(rate_limit = ?self.rate_limit, "rate limit updated");

        let pagination = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(PaginationInfo::from_link_header)
            .unwrap_or_default();

        let envelope = ResponseEnvelope {
            status: status.as_u16(),
            pagination,
            response,
        };

        if envelope.status >= 400 {
            warn!(%method, %url, status = envelope.status, "request failed");
            let body = envelope.response.text().map_err(Error::Transport)?;
            return Err(Error::Api {
                status: envelope.status,
                body,
            });
        }

        Ok(envelope)
    }

    /// Decode the envelope's body as JSON into `T`.
    pub fn decode_body<T: DeserializeOwned>(&self, envelope: ResponseEnvelope) -> Result<T> {
        serde_json::from_reader(envelope.response).map_err(Error::Decode)
    }

    /// GET and decode in one step, keeping the pagination metadata.
    pub fn get_json<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<(T, PaginationInfo)> {
        let envelope = self.get(endpoint, query)?;
        let pagination = envelope.pagination.clone();
        let value = self.decode_body(envelope)?;
        Ok((value, pagination))
    }
}
