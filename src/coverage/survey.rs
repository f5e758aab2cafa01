//! Survey spreadsheet loading.
//!
//! The survey is a CSV export (typically a published Google Sheet) with one
//! row per surveyed unit. The unit name column is `SLS` when present,
//! otherwise the second column, otherwise the first.

use csv::{ReaderBuilder, StringRecord, Trim};
use hashbrown::HashSet;
use reqwest::Client;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::cache::SourceCache;
use crate::normalize::normalize;

/// Preferred name column
pub const SLS_COLUMN: &str = "SLS";

#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: Url, status: reqwest::StatusCode },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("survey table has no columns")]
    NoColumns,
    #[error("survey table has no column named '{0}'")]
    MissingColumn(String),
}

/// Where the survey table comes from; doubles as its cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SurveySource {
    Url(Url),
    Path(PathBuf),
}

impl From<&str> for SurveySource {
    /// `http(s)` URLs are fetched; anything else is a local path.
    fn from(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SurveySource::Url(url),
            _ => SurveySource::Path(PathBuf::from(s)),
        }
    }
}

impl FromStr for SurveySource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SurveySource::from(s))
    }
}

impl fmt::Display for SurveySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveySource::Url(url) => write!(f, "{}", url),
            SurveySource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One surveyed unit as written in the spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRecord {
    pub raw_name: String,
}

/// The usable part of a survey spreadsheet
#[derive(Debug, Clone)]
pub struct SurveyTable {
    /// Header of the column the names were read from
    pub column: String,
    pub records: Vec<SurveyRecord>,
}

impl SurveyTable {
    /// Parse CSV text. `column` forces a specific header instead of the
    /// `SLS`/second/first fallback.
    pub fn from_csv<R: Read>(reader: R, column: Option<&str>) -> Result<Self, SurveyError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let idx = match column {
            Some(name) => headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SurveyError::MissingColumn(name.to_string()))?,
            None => select_column(&headers).ok_or(SurveyError::NoColumns)?,
        };

        let mut records = Vec::new();
        let mut blank = 0;
        for result in csv_reader.records() {
            let record = result?;
            match record.get(idx).map(str::trim) {
                Some(name) if !name.is_empty() => records.push(SurveyRecord {
                    raw_name: name.to_string(),
                }),
                _ => blank += 1,
            }
        }

        if blank > 0 {
            debug!("Skipped {} survey rows without a name", blank);
        }

        Ok(Self {
            column: headers[idx].to_string(),
            records,
        })
    }

    /// Normalized, deduplicated names ready for matching
    pub fn normalized_names(&self) -> HashSet<String> {
        self.records.iter().map(|r| normalize(&r.raw_name)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `SLS` if present, else the second column, else the first.
pub fn select_column(headers: &StringRecord) -> Option<usize> {
    if let Some(idx) = headers.iter().position(|h| h == SLS_COLUMN) {
        return Some(idx);
    }
    match headers.len() {
        0 => None,
        1 => Some(0),
        _ => Some(1),
    }
}

/// Loads survey tables over HTTP or from disk
pub struct SurveyFetcher {
    client: Client,
    column: Option<String>,
}

impl SurveyFetcher {
    pub fn new(column: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("batas/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, column })
    }

    /// Load the table fresh from its source
    pub async fn fetch(&self, source: &SurveySource) -> Result<SurveyTable, SurveyError> {
        let body = match source {
            SurveySource::Url(url) => self.fetch_text(url).await?,
            SurveySource::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SurveyError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };

        let table = SurveyTable::from_csv(body.as_bytes(), self.column.as_deref())?;
        info!(
            "Loaded {} survey rows from {} (column '{}')",
            table.len(),
            source,
            table.column
        );
        Ok(table)
    }

    /// Load through a cache; only successful loads are stored
    pub async fn fetch_cached(
        &self,
        source: &SurveySource,
        cache: &dyn SourceCache<SurveySource, Arc<SurveyTable>>,
    ) -> Result<Arc<SurveyTable>, SurveyError> {
        if let Some(table) = cache.get(source) {
            debug!("Survey cache hit for {}", source);
            return Ok(table);
        }

        let table = Arc::new(self.fetch(source).await?);
        cache.insert(source.clone(), Arc::clone(&table));
        Ok(table)
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, SurveyError> {
        let http_err = |source| SurveyError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_err)?;

        if !response.status().is_success() {
            return Err(SurveyError::Status {
                url: url.clone(),
                status: response.status(),
            });
        }

        response.text().await.map_err(http_err)
    }
}
