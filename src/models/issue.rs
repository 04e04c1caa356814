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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable;

/// An issue (a group of similar events).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issue {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub share_id: String,
    #[serde(deserialize_with = "nullable")]
    pub short_id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub level: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub substatus: String,
    pub status_details: Value,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_locked_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub is_public: bool,
    #[serde(deserialize_with = "nullable")]
    pub platform: String,
    #[serde(deserialize_with = "nullable")]
    pub project: IssueProject,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub issue_type: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub issue_category: String,
    /// Sent as a string by the server.
    #[serde(deserialize_with = "nullable")]
    pub count: String,
    #[serde(deserialize_with = "nullable")]
    pub user_count: i64,
    #[serde(deserialize_with = "nullable")]
    pub first_seen: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub last_seen: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub permalink: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub logger: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub culprit: String,
    pub metadata: Value,
    #[serde(deserialize_with = "nullable")]
    pub num_comments: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<IssueUser>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub owners: Vec<IssueOwner>,
    #[serde(deserialize_with = "nullable")]
    pub is_bookmarked: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_subscribed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", deserialize_with = "nullable")]
    pub is_unhandled: bool,
    pub subscription_details: Value,
    #[serde(deserialize_with = "nullable")]
    pub has_seen: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub annotations: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub activity: Vec<IssueActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueProject {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueOwner {
    /// `user`, `team`, ...
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueActivity {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<IssueUser>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub data: Map<String, Value>,
    #[serde(rename = "dateCreated", deserialize_with = "nullable")]
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueUser {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_issue_list_item() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "1341191803",
            "shortId": "BACKEND-1A",
            "title": "ZeroDivisionError: division by zero",
            "level": "error",
            "status": "unresolved",
            "substatus": "ongoing",
            "statusDetails": {},
            "isPublic": false,
            "platform": "python",
            "project": {"id": "5", "name": "Backend", "slug": "backend"},
            "type": "error",
            "count": "128",
            "userCount": 12,
            "firstSeen": "2025-08-01T09:00:00Z",
            "lastSeen": "2025-08-30T10:15:00.123Z",
            "permalink": "https://acme.sentry.io/issues/1341191803/",
            "metadata": {"type": "ZeroDivisionError", "value": "division by zero"},
            "numComments": 0,
            "assignedTo": null,
            "isBookmarked": true,
            "isSubscribed": false,
            "hasSeen": true
        }))
        .unwrap();

        assert_eq!(issue.short_id, "BACKEND-1A");
        assert_eq!(issue.count, "128");
        assert_eq!(issue.user_count, 12);
        assert_eq!(issue.project.slug, "backend");
        assert!(issue.assigned_to.is_none());
        assert!(issue.is_bookmarked);
        assert_eq!(issue.metadata["type"], "ZeroDivisionError");
    }
    #[test]
    fn null_strings_decode_as_empty() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "42",
            "shortId": "WEB-2",
            "title": "TypeError: undefined is not a function",
            "culprit": null,
            "logger": null,
            "platform": null,
            "substatus": null,
            "count": "3",
            "userCount": null,
            "annotations": null,
            "project": {"id": "6", "name": null, "slug": "web"}
        }))
        .unwrap();

        assert_eq!(issue.short_id, "WEB-2");
        assert_eq!(issue.culprit, "");
        assert_eq!(issue.logger, "");
        assert_eq!(issue.user_count, 0);
        assert!(issue.annotations.is_empty());
        assert_eq!(issue.project.slug, "web");
    }
}
