// src/config.rs

use std::path::PathBuf;
use url::Url;

use crate::error::{EvError, EvResult};
use crate::pivot::YearRange;
use crate::regions::DEFAULT_SELECTION;

pub const DEFAULT_DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/simonkrauter/Open-EV-Charts/master/data";
pub const DEFAULT_CSV_NAME: &str = "ev_sales_current_view.csv";

pub const ENV_BASE_URL: &str = "EV_DATA_BASE_URL";
pub const ENV_REGIONS: &str = "EV_REGIONS";
pub const ENV_YEAR_START: &str = "EV_YEAR_START";
pub const ENV_YEAR_END: &str = "EV_YEAR_END";
pub const ENV_CSV_OUT: &str = "EV_CSV_OUT";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Url,
    pub regions: Vec<String>,
    pub years: YearRange,
    pub csv_out: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_DATA_BASE_URL).expect("default base url should parse"),
            regions: DEFAULT_SELECTION.iter().map(|s| s.to_string()).collect(),
            years: YearRange::UNBOUNDED,
            csv_out: None,
        }
    }
}

impl Config {
    pub fn from_env() -> EvResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> EvResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(raw) = get(ENV_BASE_URL) {
            cfg.base_url = Url::parse(raw.trim())?;
        }
        if let Some(raw) = get(ENV_REGIONS) {
            cfg.regions = parse_regions(&raw);
        }
        let start = get(ENV_YEAR_START)
            .map(|v| parse_year(ENV_YEAR_START, &v))
            .transpose()?;
        let end = get(ENV_YEAR_END)
            .map(|v| parse_year(ENV_YEAR_END, &v))
            .transpose()?;
        cfg.years = YearRange::new(start, end);
        cfg.csv_out = get(ENV_CSV_OUT).map(PathBuf::from);

        Ok(cfg)
    }
}

/// Comma-separated region codes; order kept, blanks and repeats dropped.
pub fn parse_regions(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}

fn parse_year(key: &str, raw: &str) -> EvResult<i32> {
    raw.trim().parse::<i32>().map_err(|e| EvError::Config {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
