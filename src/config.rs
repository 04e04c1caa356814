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

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

use crate::client::DEFAULT_BASE_URL;

pub const TOKEN_ENV: &str = "SENTRY_API_TOKEN";
pub const BASE_URL_ENV: &str = "SENTRY_BASE_URL";
pub const CONFIG_DIR_ENV: &str = "SENTIRE_CONFIG_DIR";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentry_api_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a home directory for the current user")]
    MissingConfigDir,
    #[error(
        "SENTRY_API_TOKEN environment variable is required (or run `sentire configure --token <token>`)"
    )]
    MissingToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Env,
    File,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenSource::Flag => "--token",
            TokenSource::Env => TOKEN_ENV,
            TokenSource::File => "config file",
        })
    }
}

#[derive(Debug)]
pub struct EffectiveConfig {
    pub token: String,
    pub token_source: TokenSource,
    pub base_url: String,
}

/// `$SENTIRE_CONFIG_DIR/config.json`, or `~/.config/sentire/config.json`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(custom) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(custom).join("config.json"));
    }
    let home = home_dir().ok_or(ConfigError::MissingConfigDir)?;
    Ok(home.join(".config").join("sentire").join("config.json"))
}

pub fn load() -> Result<Option<Config>> {
    read_if_exists(&config_path()?)
}

pub fn save(config: &Config) -> Result<PathBuf> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_json::to_string_pretty(config).context("serializing config")?;
    fs::write(&path, serialized + "\n").with_context(|| format!("writing {:?}", path))?;
    Ok(path)
}

/// Token from the flag, then the environment, then the config file. The
/// base URL comes from the flag, then `SENTRY_BASE_URL`, then the default.
pub fn resolve(
    token_override: Option<String>,
    base_url_override: Option<String>,
) -> Result<EffectiveConfig> {
    let (token, token_source) = match non_empty(token_override) {
        Some(token) => (token, TokenSource::Flag),
        None => match non_empty(env::var(TOKEN_ENV).ok()) {
            Some(token) => (token, TokenSource::Env),
            None => {
                let file = load()?.unwrap_or_default();
                let token =
                    non_empty(file.sentry_api_token).ok_or(ConfigError::MissingToken)?;
                (token, TokenSource::File)
            }
        },
    };
    debug!(source = %token_source, "resolved API token");

    let base_url = non_empty(base_url_override)
        .or_else(|| non_empty(env::var(BASE_URL_ENV).ok()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(EffectiveConfig {
        token,
        token_source,
        base_url,
    })
}

/// Show the first and last four characters only.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_if_exists(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let config = serde_json::from_str(&contents).with_context(|| format!("parsing {:?}", path))?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use tempfile::{TempDir, tempdir};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn isolated() -> (MutexGuard<'static, ()>, TempDir) {
        let guard = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = tempdir().unwrap();
        unsafe {
            env::set_var(CONFIG_DIR_ENV, dir.path().join("config"));
            env::remove_var(TOKEN_ENV);
            env::remove_var(BASE_URL_ENV);
        }
        (guard, dir)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_guard, dir) = isolated();

        let config = Config {
            sentry_api_token: Some("file-token".into()),
        };
        let path = save(&config).unwrap();

        assert_eq!(path, dir.path().join("config").join("config.json"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""sentry_api_token": "file-token""#));
        assert_eq!(load().unwrap(), Some(config));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let (_guard, _dir) = isolated();

        assert_eq!(load().unwrap(), None);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let (_guard, dir) = isolated();
        let path = dir.path().join("config").join("config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let err = load().unwrap_err();
        assert!(format!("{err:#}").contains("config.json"));
    }

    #[test]
    fn token_precedence_is_flag_env_file() {
        let (_guard, _dir) = isolated();
        save(&Config {
            sentry_api_token: Some("file-token".into()),
        })
        .unwrap();

        let effective = resolve(None, None).unwrap();
        assert_eq!(effective.token, "file-token");
        assert_eq!(effective.token_source, TokenSource::File);
        assert_eq!(effective.base_url, DEFAULT_BASE_URL);

        unsafe { env::set_var(TOKEN_ENV, "env-token") };
        let effective = resolve(None, None).unwrap();
        assert_eq!(effective.token, "env-token");
        assert_eq!(effective.token_source, TokenSource::Env);

        let effective = resolve(Some("flag-token".into()), None).unwrap();
        assert_eq!(effective.token, "flag-token");
        assert_eq!(effective.token_source, TokenSource::Flag);

        unsafe { env::remove_var(TOKEN_ENV) };
    }

    #[test]
    fn empty_env_token_falls_through_to_file() {
        let (_guard, _dir) = isolated();
        save(&Config {
            sentry_api_token: Some("file-token".into()),
        })
        .unwrap();
        unsafe { env::set_var(TOKEN_ENV, "") };

        let effective = resolve(None, None).unwrap();
        assert_eq!(effective.token, "file-token");

        unsafe { env::remove_var(TOKEN_ENV) };
    }

    #[test]
    fn errors_when_no_token_anywhere() {
        let (_guard, _dir) = isolated();
        save(&Config {
            sentry_api_token: Some("   ".into()),
        })
        .unwrap();

        let err = resolve(None, None).unwrap_err();
        assert!(err.to_string().contains("SENTRY_API_TOKEN"));
    }

    #[test]
    fn base_url_override_then_env() {
        let (_guard, _dir) = isolated();
        unsafe { env::set_var(BASE_URL_ENV, "http://env.test/api/0") };

        let effective = resolve(Some("t".into()), None).unwrap();
        assert_eq!(effective.base_url, "http://env.test/api/0");

        let effective = resolve(Some("t".into()), Some("http://flag.test".into())).unwrap();
        assert_eq!(effective.base_url, "http://flag.test");

        unsafe { env::remove_var(BASE_URL_ENV) };
    }

    #[test]
    fn masks_all_but_edges() {
        assert_eq!(mask_token("sntrys_abcdef123456"), "sntr...3456");
        assert_eq!(mask_token("short"), "*****");
    }
}
