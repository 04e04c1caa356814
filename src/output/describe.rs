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

use serde_json::Value;

use super::{Record, timestamp, value_to_str};
use crate::models::{Event, Issue, Organization, OrganizationStats, Project};

/// A record that can list its own fields as ordered label/value pairs.
///
/// This is what the generic views enumerate when they do not have a
/// dedicated layout for a shape.
pub trait Describe {
    fn type_name(&self) -> &str;

    fn fields(&self) -> Vec<(String, String)>;

    /// One-line form used when the record is an item of a mixed list.
    fn summary(&self) -> String {
        self.fields()
            .into_iter()
            .take(3)
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn pair(label: &str, value: impl ToString) -> (String, String) {
    (label.to_string(), value.to_string())
}

fn push_non_empty(fields: &mut Vec<(String, String)>, label: &str, value: &str) {
    if !value.is_empty() {
        fields.push(pair(label, value));
    }
}

impl Describe for Event {
    fn type_name(&self) -> &str {
        "Event"
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            pair("ID", &self.id),
            pair("Event ID", &self.event_id),
            pair("Title", &self.title),
            pair("Message", &self.message),
            pair("Type", &self.kind),
            pair("Platform", &self.platform),
            pair("Project ID", &self.project_id),
            pair("Date Created", timestamp(&self.date_created)),
            pair("Date Received", timestamp(&self.date_received)),
            pair("Size", self.size),
        ];
        push_non_empty(&mut fields, "Group ID", &self.group_id);
        push_non_empty(&mut fields, "Logger", &self.logger);
        push_non_empty(&mut fields, "Culprit", &self.culprit);
        push_non_empty(&mut fields, "Environment", &self.environment);
        fields
    }

    fn summary(&self) -> String {
        format!("Event {} ({})", self.event_id, self.title)
    }
}

impl Describe for Issue {
    fn type_name(&self) -> &str {
        "Issue"
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            pair("ID", &self.id),
            pair("Short ID", &self.short_id),
            pair("Title", &self.title),
            pair("Level", &self.level),
            pair("Status", &self.status),
            pair("Platform", &self.platform),
            pair(
                "Project",
                format!("{} ({})", self.project.name, self.project.slug),
            ),
            pair("Count", &self.count),
            pair("User Count", self.user_count),
            pair("First Seen", timestamp(&self.first_seen)),
            pair("Last Seen", timestamp(&self.last_seen)),
            pair("Is Public", self.is_public),
            pair("Is Bookmarked", self.is_bookmarked),
            pair("Is Subscribed", self.is_subscribed),
        ];
        push_non_empty(&mut fields, "Substatus", &self.substatus);
        push_non_empty(&mut fields, "Priority", &self.priority);
        push_non_empty(&mut fields, "Culprit", &self.culprit);
        push_non_empty(&mut fields, "Logger", &self.logger);
        push_non_empty(&mut fields, "Permalink", &self.permalink);
        fields
    }

    fn summary(&self) -> String {
        format!("Issue {} ({})", self.short_id, self.title)
    }
}

impl Describe for Project {
    fn type_name(&self) -> &str {
        "Project"
    }

    fn fields(&self) -> Vec<(String, String)> {
        vec![
            pair("ID", &self.id),
            pair("Slug", &self.slug),
            pair("Name", &self.name),
            pair("Platform", &self.platform),
            pair(
                "Organization",
                format!("{} ({})", self.organization.name, self.organization.slug),
            ),
            pair("Date Created", timestamp(&self.date_created)),
            pair("Status", &self.status),
            pair("Is Public", self.is_public),
            pair("Is Bookmarked", self.is_bookmarked),
        ]
    }

    fn summary(&self) -> String {
        format!("Project {} ({})", self.slug, self.name)
    }
}

impl Describe for Organization {
    fn type_name(&self) -> &str {
        "Organization"
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            pair("ID", &self.id),
            pair("Slug", &self.slug),
            pair("Name", &self.name),
            pair("Date Created", timestamp(&self.date_created)),
        ];
        push_non_empty(&mut fields, "Status", &self.status.name);
        fields
    }
}

impl Describe for OrganizationStats {
    fn type_name(&self) -> &str {
        "OrganizationStats"
    }

    fn fields(&self) -> Vec<(String, String)> {
        vec![
            pair("Start Time", timestamp(&self.start)),
            pair("End Time", timestamp(&self.end)),
            pair("Total Sum", self.totals.sum),
            pair("Times Seen", self.totals.times_seen),
            pair("Projects", self.projects.len()),
        ]
    }
}

/// Objects list their keys in server order; anything else is a single value.
impl Describe for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Object(_) => "Data",
            _ => "Value",
        }
    }

    fn fields(&self) -> Vec<(String, String)> {
        match self {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), value_to_str(value)))
                .collect(),
            Value::Null => vec![pair("Value", "<nil>")],
            other => vec![pair("Value", value_to_str(other))],
        }
    }

    fn summary(&self) -> String {
        match self {
            Value::Null => "<nil>".to_string(),
            other => value_to_str(other),
        }
    }
}

impl Describe for Record {
    fn type_name(&self) -> &str {
        self.inner().type_name()
    }

    fn fields(&self) -> Vec<(String, String)> {
        self.inner().fields()
    }

    fn summary(&self) -> String {
        self.inner().summary()
    }
}

impl Record {
    fn inner(&self) -> &dyn Describe {
        match self {
            Record::Event(event) => &**event,
            Record::Issue(issue) => &**issue,
            Record::Project(project) => &**project,
            Record::Organization(organization) => &**organization,
            Record::OrgStats(stats) => &**stats,
            Record::Value(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;
    use serde_json::json;

    #[test]
    fn event_fields_skip_empty_optionals() {
        let mut event = fixtures::event();
        event.logger.clear();
        event.culprit.clear();

        let labels: Vec<String> = event.fields().into_iter().map(|(label, _)| label).collect();

        assert_eq!(labels.first().map(String::as_str), Some("ID"));
        assert!(labels.contains(&"Group ID".to_string()));
        assert!(labels.contains(&"Environment".to_string()));
        assert!(!labels.contains(&"Logger".to_string()));
        assert!(!labels.contains(&"Culprit".to_string()));
    }

    #[test]
    fn required_fields_render_even_when_empty() {
        let event = Event::default();
        let fields = event.fields();

        assert!(fields.contains(&("Message".to_string(), String::new())));
        assert!(fields.contains(&("Size".to_string(), "0".to_string())));
    }

    #[test]
    fn object_values_keep_key_order() {
        let value = json!({"zeta": 1, "alpha": {"nested": true}, "mid": null});

        assert_eq!(value.type_name(), "Data");
        assert_eq!(
            value.fields(),
            vec![
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), r#"{"nested":true}"#.to_string()),
                ("mid".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn scalar_values_describe_as_single_field() {
        assert_eq!(json!(42).fields(), vec![("Value".to_string(), "42".to_string())]);
        assert_eq!(Value::Null.summary(), "<nil>");
    }

    #[test]
    fn record_delegates_to_inner_shape() {
        let record = Record::from(fixtures::issue());

        assert_eq!(record.type_name(), "Issue");
        assert_eq!(record.summary(), "Issue BACKEND-1A (ZeroDivisionError: division by zero in views)");
    }
}
