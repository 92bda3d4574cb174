// src/extract/mod.rs

pub mod body;
pub mod types;

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::reconcile::resolve;
pub use types::{BodyValue, DataType, PeriodRecord, RawRecord, Row};

/// One matched call whose body could not be parsed. Never fatal.
#[derive(Debug, Error)]
#[error("unparseable body for {region} {period} {data_type}: {source}")]
pub struct RecordParseError {
    pub region: String,
    pub period: String,
    pub data_type: String,
    #[source]
    pub source: serde_json::Error,
}

/// Finds every
/// `db.insert(db.countries.<CODE>, "<period>", db.dsTypes.<Type>, "<ignored>", { ... })`
/// call for one region code. Anything else in the text is ignored.
pub struct RecordScanner {
    region: String,
    pattern: Regex,
}

impl RecordScanner {
    pub fn new(region: &str) -> Self {
        let pattern = format!(
            concat!(
                r"(?s)db\.insert\(\s*db\.countries\.{}\s*,\s*",
                r#""([^"]+)"\s*,\s*"#,
                r"db\.dsTypes\.(\w+)\s*,\s*",
                r#""[^"]*"\s*,\s*"#,
                r"\{{(.*?)\}}\s*\)",
            ),
            regex::escape(region)
        );
        Self {
            region: region.to_string(),
            pattern: Regex::new(&pattern).expect("escaped region pattern should compile"),
        }
    }

    /// Yields one result per matched call, in source order.
    pub fn scan<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = Result<RawRecord, RecordParseError>> + 'a {
        self.pattern
            .captures_iter(text)
            .map(move |caps| self.to_record(&caps))
    }

    fn to_record(&self, caps: &Captures<'_>) -> Result<RawRecord, RecordParseError> {
        let period = caps[1].to_string();
        let type_token = &caps[2];
        let fields = body::parse_body(&caps[3]).map_err(|source| RecordParseError {
            region: self.region.clone(),
            period: period.clone(),
            data_type: type_token.to_string(),
            source,
        })?;
        Ok(RawRecord {
            region: self.region.clone(),
            period,
            data_type: DataType::from_token(type_token),
            fields,
        })
    }
}

/// Collect per-period sums for every recognized data type. A later record
/// with the same period and type replaces the earlier one.
pub fn collect_periods(text: &str, region: &str) -> BTreeMap<String, PeriodRecord> {
    let scanner = RecordScanner::new(region);
    let mut periods: BTreeMap<String, PeriodRecord> = BTreeMap::new();
    let (mut matched, mut skipped) = (0usize, 0usize);

    for result in scanner.scan(text) {
        matched += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                skipped += 1;
                warn!(region = %e.region, period = %e.period, data_type = %e.data_type, error = %e.source, "skipping record");
                continue;
            }
        };
        if !record.data_type.is_recognized() {
            debug!(region, period = %record.period, data_type = record.data_type.as_str(), "ignoring unrecognized data type");
            continue;
        }
        let sum = record.numeric_sum();
        periods
            .entry(record.period)
            .or_default()
            .sums
            .insert(record.data_type, sum);
    }

    debug!(region, matched, skipped, periods = periods.len(), "scanned data file");
    periods
}

/// Parse one region's data file into resolved rows, ordered by period.
/// Periods without a recognized data type produce no row.
#[instrument(level = "debug", skip(text), fields(text_len = text.len()))]
pub fn extract_rows(text: &str, region: &str) -> Vec<Row> {
    collect_periods(text, region)
        .into_iter()
        .filter_map(|(period, record)| resolve(&record).map(|value| Row { period, value }))
        .collect()
}
