// src/session.rs

use std::fmt;
use tracing::{error, info, warn};

use crate::error::{EvError, EvResult};
use crate::export;
use crate::fetch::{load_regions, DataSource};
use crate::pivot::{compute_stats, Pivot, Series, Stats, YearRange};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    NeedsSelection,
    Loaded { periods: usize, regions: usize },
    Failed(String),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Idle => f.write_str(""),
            LoadStatus::NeedsSelection => f.write_str("Select at least one region."),
            LoadStatus::Loaded { periods, regions } => {
                write!(f, "Loaded {} periods for {} region(s).", periods, regions)
            }
            LoadStatus::Failed(_) => f.write_str("Error loading data."),
        }
    }
}

/// What the rendering layer draws: the range-filtered pivot for the
/// selection that produced it, plus its stats.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub regions: Vec<String>,
    pub pivot: Pivot,
    pub stats: Option<Stats>,
}

impl View {
    pub fn series(&self) -> Series {
        self.pivot.series(&self.regions)
    }
}

/// Everything the dashboard knows at one point in time. Each transition
/// returns a new value; a failed load leaves pivot, selection and range as
/// they were.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    selection: Vec<String>,
    pivot: Option<Pivot>,
    range: YearRange,
    status: LoadStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selection: Vec::new(),
            pivot: None,
            range: YearRange::UNBOUNDED,
            status: LoadStatus::Idle,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn pivot(&self) -> Option<&Pivot> {
        self.pivot.as_ref()
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Fetch, extract and pivot `selection`. On success the pivot is replaced
    /// and the range reset to the years it covers.
    pub async fn load<S: DataSource>(&self, source: &S, selection: &[String]) -> Session {
        match self.try_load(source, selection).await {
            Ok(next) => next,
            Err(EvError::EmptySelection) => {
                warn!("load requested with no regions selected");
                self.with_status(LoadStatus::NeedsSelection)
            }
            Err(e) => {
                error!(error = %e, "load failed; keeping previous data");
                self.with_status(LoadStatus::Failed(e.to_string()))
            }
        }
    }

    /// Like [`Session::load`], but hands the error back instead of folding it
    /// into the status.
    pub async fn try_load<S: DataSource>(&self, source: &S, selection: &[String]) -> EvResult<Session> {
        let loaded = load_regions(source, selection).await?;
        let pivot = Pivot::build(
            loaded
                .iter()
                .map(|r| (r.region.as_str(), r.rows.as_slice())),
        );
        let range = YearRange::covering(&pivot);
        info!(periods = pivot.len(), regions = selection.len(), ?range, "pivot rebuilt");
        Ok(Session {
            selection: selection.to_vec(),
            status: LoadStatus::Loaded {
                periods: pivot.len(),
                regions: selection.len(),
            },
            pivot: Some(pivot),
            range,
        })
    }

    pub fn with_start(&self, start: Option<i32>) -> Session {
        self.with_range(self.range.with_start(start))
    }

    pub fn with_end(&self, end: Option<i32>) -> Session {
        self.with_range(self.range.with_end(end))
    }

    pub fn with_range(&self, range: YearRange) -> Session {
        Session {
            range: YearRange::new(range.start(), range.end()),
            ..self.clone()
        }
    }

    fn with_status(&self, status: LoadStatus) -> Session {
        Session {
            status,
            ..self.clone()
        }
    }

    /// The filtered view, or `None` before the first successful load.
    pub fn view(&self) -> Option<View> {
        let pivot = self.range.filter(self.pivot.as_ref()?);
        let stats = compute_stats(&pivot, &self.selection);
        Some(View {
            regions: self.selection.clone(),
            pivot,
            stats,
        })
    }

    /// CSV of the current view.
    pub fn export_csv(&self) -> EvResult<String> {
        match self.view() {
            Some(view) if !view.regions.is_empty() => export::to_csv(&view.pivot, &view.regions),
            _ => Err(EvError::NothingToExport(
                "No data to download. Load the chart first.",
            )),
        }
    }
}
