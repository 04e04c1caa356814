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
use serde_json::Value;

use super::nullable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub date_created: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub status: OrganizationStatus,
    #[serde(deserialize_with = "nullable")]
    pub avatar: OrganizationAvatar,
    #[serde(deserialize_with = "nullable")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub is_early_adopter: bool,
    #[serde(deserialize_with = "nullable")]
    pub access: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationStatus {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationAvatar {
    #[serde(deserialize_with = "nullable")]
    pub avatar_type: String,
    #[serde(deserialize_with = "nullable")]
    pub avatar_uuid: String,
}

/// Response of the organization `stats-summary` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationStats {
    #[serde(deserialize_with = "nullable")]
    pub start: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub end: DateTime<Utc>,
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<ProjectStatsDetail>,
    #[serde(deserialize_with = "nullable")]
    pub totals: StatsSummaryTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSummaryTotals {
    #[serde(deserialize_with = "nullable")]
    pub sum: i64,
    #[serde(deserialize_with = "nullable")]
    pub times_seen: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStatsDetail {
    /// Numeric or string depending on the endpoint version.
    pub id: Value,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub stats: Vec<CategoryStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStats {
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    #[serde(deserialize_with = "nullable")]
    pub outcomes: StatsOutcomes,
    #[serde(deserialize_with = "nullable")]
    pub totals: StatsTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsOutcomes {
    #[serde(deserialize_with = "nullable")]
    pub accepted: i64,
    #[serde(deserialize_with = "nullable")]
    pub filtered: i64,
    #[serde(deserialize_with = "nullable")]
    pub rate_limited: i64,
    #[serde(deserialize_with = "nullable")]
    pub invalid: i64,
    #[serde(deserialize_with = "nullable")]
    pub abuse: i64,
    #[serde(deserialize_with = "nullable")]
    pub client_discard: i64,
    #[serde(deserialize_with = "nullable")]
    pub cardinality_limited: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsTotals {
    #[serde(deserialize_with = "nullable")]
    pub dropped: i64,
    #[serde(rename = "sum(quantity)", deserialize_with = "nullable")]
    pub sum: i64,
    #[serde(deserialize_with = "nullable")]
    pub times_seen: i64,
}
