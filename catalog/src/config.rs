//! `.catalog.toml` configuration.
//!
//! # Configuration File Format
//!
//! ```toml
//! api_url = "${env:CATALOG_API}"
//! data_dir = "fixtures"
//! stale_secs = 300
//! timeout_secs = 30
//! ```
//!
//! String values may reference environment variables as `${env:NAME}`.
//! Command line flags override file values.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use chrono::TimeDelta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::source::{ConfiguredSource, DirSource, HttpSource};

pub const DEFAULT_CONFIG_FILE: &str = ".catalog.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog API; collections are read from `{api_url}/{name}`.
    pub api_url: Option<String>,
    /// Directory holding `subjects.json`, `difficulties.json`, `grades.json`
    /// and `courses.json`. Used when `api_url` is not set.
    pub data_dir: Option<PathBuf>,
    /// Seconds fetched data stays fresh.
    pub stale_secs: u64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            data_dir: None,
            stale_secs: 300,
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    /// Load the configuration at `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse TOML, expanding `${env:NAME}` in every string value.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut value: toml::Value = toml::from_str(content)?;
        expand_strings(&mut value);
        Ok(value.try_into()?)
    }

    /// `stale_secs` as a [`TimeDelta`], saturating at [`TimeDelta::MAX`].
    pub fn stale_time(&self) -> TimeDelta {
        i64::try_from(self.stale_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The data source this configuration points at; the API wins over a
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when neither `api_url` nor `data_dir` is set, or the
    /// HTTP client cannot be created.
    pub fn source(&self) -> anyhow::Result<ConfiguredSource> {
        if let Some(url) = self.api_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(ConfiguredSource::Http(HttpSource::new(url, self.timeout())?));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(ConfiguredSource::Dir(DirSource::new(dir)));
        }
        bail!("no data source configured: set `api_url` or `data_dir` (or pass --api-url / --data-dir)")
    }
}

fn expand_strings(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = expand_env_placeholders(s),
        toml::Value::Array(items) => items.iter_mut().for_each(expand_strings),
        toml::Value::Table(table) => table.iter_mut().for_each(|(_, v)| expand_strings(v)),
        _ => {}
    }
}

/// Replace `${env:NAME}` with the value of the environment variable `NAME`.
///
/// Unset variables expand to the empty string. Other `${...}` forms and
/// unterminated placeholders are kept verbatim.
///
/// ```rust
/// use catalog::config::expand_env_placeholders;
///
/// unsafe { std::env::set_var("CATALOG_DOC_HOST", "example.org"); }
/// assert_eq!(
///     expand_env_placeholders("https://${env:CATALOG_DOC_HOST}/api"),
///     "https://example.org/api"
/// );
/// ```
pub fn expand_env_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        match body.strip_prefix("env:") {
            Some(name) => {
                let value = std::env::var(name).unwrap_or_default();
                debug!("expanded ${{env:{name}}}");
                out.push_str(&value);
            }
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
