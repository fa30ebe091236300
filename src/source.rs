use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::http_client::{fetch_text, http_client};
use crate::records::{LegacyRow, RawRecord, SchemaTag, SummaryRow};

pub trait MatchRecordSource {
    fn fetch(&self) -> Result<Vec<RawRecord>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Path(PathBuf),
    Url(String),
}

impl DatasetLocation {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DatasetLocation::Url(raw.to_string())
        } else {
            DatasetLocation::Path(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLocation::Path(p) => write!(f, "{}", p.display()),
            DatasetLocation::Url(u) => f.write_str(u),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    pub location: DatasetLocation,
    pub schema: SchemaTag,
    pub season: Option<String>,
}

impl DatasetSpec {
    pub fn new(location: DatasetLocation, schema: SchemaTag) -> Self {
        Self {
            location,
            schema,
            season: None,
        }
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    datasets: Vec<DatasetSpec>,
    timeout_secs: u64,
}

impl CsvDatasetSource {
    pub fn new(datasets: Vec<DatasetSpec>, timeout_secs: u64) -> Self {
        Self {
            datasets,
            timeout_secs,
        }
    }

    pub fn datasets(&self) -> &[DatasetSpec] {
        &self.datasets
    }

    fn read_text(&self, location: &DatasetLocation) -> Result<String> {
        match location {
            DatasetLocation::Path(path) => fs::read_to_string(path)
                .with_context(|| format!("read dataset {}", path.display())),
            DatasetLocation::Url(url) => {
                let client = http_client(self.timeout_secs)?;
                fetch_text(client, url)
            }
        }
    }
}

impl MatchRecordSource for CsvDatasetSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let mut out = Vec::new();
        for spec in &self.datasets {
            let text = self
                .read_text(&spec.location)
                .with_context(|| format!("fetch dataset {}", spec.location))?;
            let mut rows = parse_dataset(&text, spec.schema)
                .with_context(|| format!("decode dataset {}", spec.location))?;
            if let Some(season) = spec.season.as_deref() {
                rows.retain(|r| r.season() == season);
            }
            info!(dataset = %spec.location, schema = ?spec.schema, rows = rows.len(), "loaded dataset");
            out.extend(rows);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl MatchRecordSource for InMemorySource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

/// Decode CSV text under `schema`. Rows that fail to decode are skipped with a
/// warning; a malformed header fails the whole dataset.
pub fn parse_dataset(text: &str, schema: SchemaTag) -> Result<Vec<RawRecord>> {
    match schema {
        SchemaTag::Legacy => parse_rows::<LegacyRow>(text).map(|rows| {
            rows.into_iter().map(RawRecord::Legacy).collect()
        }),
        SchemaTag::SeasonSummary => parse_rows::<SummaryRow>(text).map(|rows| {
            rows.into_iter().map(RawRecord::SeasonSummary).collect()
        }),
    }
}

fn parse_rows<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    reader.headers().context("invalid csv header")?;

    let mut out = Vec::new();
    for (line, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(row) => out.push(row),
            Err(err) => warn!(row = line + 1, error = %err, "skipping undecodable row"),
        }
    }
    Ok(out)
}
