use anyhow::{Result, anyhow};

use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::records::SchemaTag;
use crate::source::{DatasetLocation, DatasetSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    pub datasets: Vec<DatasetSpec>,
    pub http_timeout_secs: u64,
    pub seed: Option<u64>,
}

impl PredictorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut datasets = Vec::new();
        if let Some(loc) = var("IPL_LEGACY_SOURCE") {
            datasets.push(DatasetSpec::new(DatasetLocation::parse(&loc), SchemaTag::Legacy));
        }
        for (key, season) in [("IPL_2023_SOURCE", "2023"), ("IPL_2024_SOURCE", "2024")] {
            if let Some(loc) = var(key) {
                datasets.push(
                    DatasetSpec::new(DatasetLocation::parse(&loc), SchemaTag::SeasonSummary)
                        .with_season(season),
                );
            }
        }
        if datasets.is_empty() {
            return Err(anyhow!(
                "no match datasets configured (set IPL_LEGACY_SOURCE, IPL_2023_SOURCE or IPL_2024_SOURCE)"
            ));
        }

        let http_timeout_secs = var("IPL_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(2);
        let seed = var("IPL_SEED").and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            datasets,
            http_timeout_secs,
            seed,
        })
    }
}
