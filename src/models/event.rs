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

/// A single event as returned by the event list and detail endpoints.
///
/// List endpoints return a subset of these fields unless `full=true` is
/// requested; everything absent decodes to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "eventID", deserialize_with = "nullable")]
    pub event_id: String,
    #[serde(rename = "projectID", deserialize_with = "nullable")]
    pub project_id: String,
    #[serde(
        rename = "groupID",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "nullable"
    )]
    pub group_id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub platform: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(rename = "dateCreated", deserialize_with = "nullable")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "dateReceived", deserialize_with = "nullable")]
    pub date_received: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub size: i64,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub dist: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub logger: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub culprit: String,

    #[serde(deserialize_with = "nullable")]
    pub entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Exception>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Breadcrumbs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,

    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<EventTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EventUser>,
    /// Keyed by context name (`browser`, `os`, `runtime`, `trace`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub extra: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub metadata: Map<String, Value>,
    #[serde(deserialize_with = "nullable")]
    pub fingerprint: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<EventRelease>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<EventSdk>,

    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub errors: Vec<EventError>,
}

/// One typed entry of an event (`exception`, `breadcrumbs`, `request`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exception {
    #[serde(deserialize_with = "nullable")]
    pub values: Vec<ExceptionValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExceptionValue {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<Mechanism>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Stacktrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mechanism {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handled: Option<bool>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stacktrace {
    #[serde(deserialize_with = "nullable")]
    pub frames: Vec<StackFrame>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub frames_omitted: Vec<i64>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub registers: Map<String, Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not", deserialize_with = "nullable")]
    pub has_system_frames: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackFrame {
    #[serde(deserialize_with = "nullable")]
    pub filename: String,
    #[serde(deserialize_with = "nullable")]
    pub function: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_no: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_no: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub abs_path: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub context_line: String,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub pre_context: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub post_context: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_app: Option<bool>,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub vars: Map<String, Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub package: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub platform: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub image_addr: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub instruction_addr: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub symbol_addr: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub symbol: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub trust: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumbs {
    #[serde(deserialize_with = "nullable")]
    pub values: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breadcrumb {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub level: String,
}

/// HTTP request captured with the event. Header and body shapes vary by
/// SDK, so they stay as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Request {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub method: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub headers: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub query_string: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub cookies: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub env: Value,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub fragment: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub inferred_content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTag {
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUser {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub email: String,
    #[serde(
        rename = "ip_address",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "nullable"
    )]
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRelease {
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub short_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSdk {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
}

/// Processing error attached to the event by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventError {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty", deserialize_with = "nullable")]
    pub data: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_fields_decode_as_defaults() {
        let event: Event = serde_json::from_value(json!({
            "id": "2",
            "eventID": "b7d1c5f0e2a94c1f8e3f2a6d9c0b1e4a",
            "dist": null,
            "location": null,
            "logger": null,
            "environment": null,
            "tags": null,
            "fingerprint": null,
            "user": null,
            "entries": [{"type": "message", "data": null}]
        }))
        .unwrap();

        assert_eq!(event.event_id, "b7d1c5f0e2a94c1f8e3f2a6d9c0b1e4a");
        assert_eq!(event.dist, "");
        assert_eq!(event.location, "");
        assert!(event.tags.is_empty());
        assert!(event.user.is_none());
        assert_eq!(event.entries[0].kind, "message");
        assert!(event.entries[0].data.is_null());
    }

    fn full_event_json() -> Value {
        json!({
            "id": "1",
            "eventID": "9fac2ceed9344f2bbfdd1fdacb0ed9b1",
            "projectID": "5",
            "groupID": "1341191803",
            "title": "ZeroDivisionError: division by zero",
            "message": "",
            "platform": "python",
            "type": "error",
            "dateCreated": "2025-08-30T10:15:00Z",
            "dateReceived": "2025-08-30T10:16:00Z",
            "size": 6500,
            "culprit": "app.views in divide",
            "entries": [
                {
                    "type": "exception",
                    "data": {"values": [{"type": "ZeroDivisionError", "value": "division by zero"}]}
                },
                {"type": "breadcrumbs", "data": {"values": []}}
            ],
            "exception": {
                "values": [{
                    "type": "ZeroDivisionError",
                    "value": "division by zero",
                    "mechanism": {"type": "django", "handled": false},
                    "stacktrace": {
                        "frames": [{
                            "filename": "app/views.py",
                            "function": "divide",
                            "lineNo": 42,
                            "inApp": true,
                            "contextLine": "    return a / b",
                            "vars": {"a": 1, "b": 0}
                        }]
                    }
                }]
            },
            "tags": [{"key": "environment", "value": "production"}],
            "user": {"id": "42", "email": "jane@example.com", "ip_address": "127.0.0.1"},
            "contexts": {"runtime": {"name": "CPython", "version": "3.12.1"}},
            "extra": {"sys.argv": ["manage.py", "runserver"]},
            "fingerprint": ["{{ default }}"],
            "release": {"version": "backend@1.2.3", "shortVersion": "1.2.3"},
            "environment": "production",
            "sdk": {"name": "sentry.python", "version": "2.1.0"},
            "errors": [{"type": "js_no_source", "name": "url", "message": "missing"}]
        })
    }

    #[test]
    fn decodes_full_event() {
        let event: Event = serde_json::from_value(full_event_json()).unwrap();

        assert_eq!(event.event_id, "9fac2ceed9344f2bbfdd1fdacb0ed9b1");
        assert_eq!(event.kind, "error");
        assert_eq!(event.entries.len(), 2);
        let exception = event.exception.as_ref().unwrap();
        let frame = &exception.values[0].stacktrace.as_ref().unwrap().frames[0];
        assert_eq!(frame.line_no, Some(42));
        assert_eq!(frame.in_app, Some(true));
        assert_eq!(frame.vars["b"], json!(0));
        assert_eq!(exception.values[0].mechanism.as_ref().unwrap().handled, Some(false));
        assert_eq!(event.user.as_ref().unwrap().ip_address, "127.0.0.1");
        assert_eq!(event.release.as_ref().unwrap().short_version, "1.2.3");
        assert_eq!(event.errors[0].kind, "js_no_source");
    }

    #[test]
    fn decodes_minimal_list_entry() {
        let event: Event = serde_json::from_value(json!({
            "id": "1",
            "eventID": "abc",
            "title": "Oops",
            "dateCreated": "2025-08-30T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(event.title, "Oops");
        assert!(event.entries.is_empty());
        assert!(event.exception.is_none());
        assert!(event.environment.is_empty());
    }

    #[test]
    fn extra_keeps_server_key_order() {
        let event: Event = serde_json::from_value(json!({
            "extra": {"zeta": 1, "alpha": 2, "mid": 3}
        }))
        .unwrap();

        let keys: Vec<&str> = event.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
