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

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use thiserror::Error;

/// Organization and issue id extracted from an issue page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueUrl {
    pub organization: String,
    pub issue_id: String,
}

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL format: {0}")]
    Malformed(String),
    #[error("invalid Sentry URL: expected format https://orgname.sentry.io/...")]
    Host,
    #[error("invalid issue URL: expected format /issues/<issue_id>/")]
    IssuePath,
    #[error("invalid pattern {pattern}: {source}")]
    Pattern {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}

const HOST_PATTERN: &str = r"^([^.]+)\.sentry\.io$";
const ISSUE_PATH_PATTERN: &str = r"/issues/(\d+)/?";

static HOST_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(HOST_PATTERN));
static ISSUE_PATH_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(ISSUE_PATH_PATTERN));

fn compiled(
    re: &'static LazyLock<Result<Regex, regex::Error>>,
    pattern: &'static str,
) -> Result<&'static Regex, UrlError> {
    LazyLock::force(re)
        .as_ref()
        .map_err(|source| UrlError::Pattern {
            pattern,
            source: source.clone(),
        })
}

/// Parse `https://<org>.sentry.io/issues/<id>/...`. Query strings and any
/// trailing path after the id are ignored.
pub fn parse_issue_url(raw: &str) -> Result<IssueUrl, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Malformed(e.to_string()))?;

    let organization = compiled(&HOST_RE, HOST_PATTERN)?
        .captures(url.host_str().unwrap_or_default())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(UrlError::Host)?;

    let issue_id = compiled(&ISSUE_PATH_RE, ISSUE_PATH_PATTERN)?
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(UrlError::IssuePath)?;

    Ok(IssueUrl {
        organization,
        issue_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_issue_url() {
        let parsed = parse_issue_url("https://acme.sentry.io/issues/6789012345/").unwrap();

        assert_eq!(
            parsed,
            IssueUrl {
                organization: "acme".into(),
                issue_id: "6789012345".into(),
            }
        );
    }

    #[test]
    fn ignores_query_and_trailing_segments() {
        let parsed = parse_issue_url(
            "https://my-org.sentry.io/issues/42/events/latest/?project=5&query=is%3Aunresolved",
        )
        .unwrap();

        assert_eq!(parsed.organization, "my-org");
        assert_eq!(parsed.issue_id, "42");
    }

    #[test]
    fn rejects_other_hosts() {
        let err = parse_issue_url("https://sentry.io/organizations/acme/issues/42/").unwrap_err();
        assert!(err.to_string().contains("orgname.sentry.io"));

        let err = parse_issue_url("https://acme.sentry.example.com/issues/42/").unwrap_err();
        assert!(matches!(err, UrlError::Host));
    }

    #[test]
    fn rejects_non_numeric_issue_ids() {
        let err = parse_issue_url("https://acme.sentry.io/issues/BACKEND-1A/").unwrap_err();
        assert!(matches!(err, UrlError::IssuePath));
        assert!(err.to_string().contains("/issues/<issue_id>/"));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_issue_url("not a url").unwrap_err();
        assert!(matches!(err, UrlError::Malformed(_)));
        assert!(err.to_string().starts_with("invalid URL format"));
    }

    #[test]
    fn patterns_compile_once() {
        let first = compiled(&HOST_RE, HOST_PATTERN).unwrap();
        let again = compiled(&HOST_RE, HOST_PATTERN).unwrap();

        assert!(std::ptr::eq(first, again));
        assert!(compiled(&ISSUE_PATH_RE, ISSUE_PATH_PATTERN).is_ok());
    }
}
