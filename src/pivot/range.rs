// src/pivot/range.rs

use serde::{Deserialize, Serialize};

use super::Pivot;

/// Inclusive year interval. `None` leaves that side open. Whenever both
/// bounds are set, `start <= end` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawYearRange")]
pub struct YearRange {
    start: Option<i32>,
    end: Option<i32>,
}

// Deserialized bounds go through `YearRange::new` so they come out ordered.
#[derive(Deserialize)]
struct RawYearRange {
    #[serde(default)]
    start: Option<i32>,
    #[serde(default)]
    end: Option<i32>,
}

impl From<RawYearRange> for YearRange {
    fn from(raw: RawYearRange) -> Self {
        YearRange::new(raw.start, raw.end)
    }
}

impl YearRange {
    pub const UNBOUNDED: YearRange = YearRange {
        start: None,
        end: None,
    };

    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if s > e => YearRange {
                start: Some(e),
                end: Some(s),
            },
            _ => YearRange { start, end },
        }
    }

    /// The full span of years present in `pivot`.
    pub fn covering(pivot: &Pivot) -> Self {
        match pivot.year_bounds() {
            Some((lo, hi)) => YearRange::new(Some(lo), Some(hi)),
            None => YearRange::UNBOUNDED,
        }
    }

    pub fn start(&self) -> Option<i32> {
        self.start
    }

    pub fn end(&self) -> Option<i32> {
        self.end
    }

    pub fn with_start(self, start: Option<i32>) -> Self {
        YearRange::new(start, self.end)
    }

    pub fn with_end(self, end: Option<i32>) -> Self {
        YearRange::new(self.start, end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a period token falls inside the range. With any bound set,
    /// tokens without a leading year never match.
    pub fn contains_period(&self, period: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match period_year(period) {
            Some(year) => {
                self.start.map_or(true, |s| year >= s) && self.end.map_or(true, |e| year <= e)
            }
            None => false,
        }
    }

    /// New pivot holding only the periods inside the range.
    pub fn filter(&self, pivot: &Pivot) -> Pivot {
        if self.is_unbounded() {
            return pivot.clone();
        }
        pivot.retain_periods(|p| self.contains_period(p))
    }
}

/// Year from the first four characters of a period token (`2021`, `2021-Q3`).
pub fn period_year(period: &str) -> Option<i32> {
    let prefix = period.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
