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

use thiserror::Error;

/// Failures surfaced by the HTTP pipeline, the accessors and the renderers.
///
/// Each variant names the stage that failed so the CLI can report it
/// without inspecting messages.
#[derive(Debug, Error)]
pub enum Error {
    /// DNS, connection, TLS or timeout failure before a response arrived.
    #[error("http request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a status >= 400. `body` is the raw text.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A required option was missing; no request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
