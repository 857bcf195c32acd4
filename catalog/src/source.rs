//! Where catalog collections come from.
//!
//! Every collection is a JSON array served under one [`Endpoint`]. Sources
//! only move bytes; decoding into records happens in [`DataSource::fetch`].

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The four collections the catalog reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Subjects,
    Difficulties,
    Grades,
    Courses,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Subjects,
        Endpoint::Difficulties,
        Endpoint::Grades,
        Endpoint::Courses,
    ];

    /// URL path segment and file stem.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Subjects => "subjects",
            Endpoint::Difficulties => "difficulties",
            Endpoint::Grades => "grades",
            Endpoint::Courses => "courses",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {endpoint} payload: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {0} data available")]
    Missing(Endpoint),
}

/// A provider of the catalog's JSON collections.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// The raw JSON document served for `endpoint`.
    async fn fetch_raw(&self, endpoint: Endpoint) -> Result<Value, SourceError>;

    /// The collection at `endpoint` decoded into records.
    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Vec<T>, SourceError> {
        let raw = self.fetch_raw(endpoint).await?;
        let records: Vec<T> = serde_json::from_value(raw)
            .map_err(|source| SourceError::Decode { endpoint, source })?;
        debug!("fetched {} {endpoint}", records.len());
        Ok(records)
    }
}

/// GET `{base_url}/{endpoint}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }
}

impl DataSource for HttpSource {
    async fn fetch_raw(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        let url = self.url(endpoint);
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { url, status });
        }

        resp.json::<Value>()
            .await
            .map_err(|source| SourceError::Http { url, source })
    }
}

/// Reads `{dir}/{endpoint}.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self, endpoint: Endpoint) -> PathBuf {
        self.dir.join(format!("{}.json", endpoint.path()))
    }
}

impl DataSource for DirSource {
    async fn fetch_raw(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        let path = self.file(endpoint);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode { endpoint, source })
    }
}

/// Collections held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: HashMap<Endpoint, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: Endpoint, data: Value) -> Self {
        self.insert(endpoint, data);
        self
    }

    pub fn insert(&mut self, endpoint: Endpoint, data: Value) {
        self.data.insert(endpoint, data);
    }
}

impl DataSource for MemorySource {
    async fn fetch_raw(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        self.data
            .get(&endpoint)
            .cloned()
            .ok_or(SourceError::Missing(endpoint))
    }
}

/// The source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(HttpSource),
    Dir(DirSource),
}

impl DataSource for ConfiguredSource {
    async fn fetch_raw(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        match self {
            ConfiguredSource::Http(source) => source.fetch_raw(endpoint).await,
            ConfiguredSource::Dir(source) => source.fetch_raw(endpoint).await,
        }
    }
}

impl fmt::Display for ConfiguredSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfiguredSource::Http(source) => write!(f, "{}", source.base_url()),
            ConfiguredSource::Dir(source) => write!(f, "{}", source.dir().display()),
        }
    }
}
