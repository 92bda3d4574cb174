// src/pivot/mod.rs

pub mod range;
pub mod stats;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::extract::Row;

pub use range::YearRange;
pub use stats::{compute_stats, Stats};

/// period → region → value. An absent cell means "no data", which is not
/// the same as zero. Periods iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Pivot {
    cells: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Chart-ready view: sorted period labels and one aligned column per region.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl Pivot {
    /// Co-index every region's rows by period. No values are combined across
    /// regions, so the result does not depend on the order of `datasets`.
    pub fn build<'a, I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Row])>,
    {
        let mut pivot = Pivot::default();
        for (region, rows) in datasets {
            for row in rows {
                pivot.insert(&row.period, region, row.value);
            }
        }
        pivot
    }

    pub fn insert(&mut self, period: &str, region: &str, value: f64) {
        self.cells
            .entry(period.to_string())
            .or_default()
            .insert(region.to_string(), value);
    }

    pub fn get(&self, period: &str, region: &str) -> Option<f64> {
        self.cells.get(period)?.get(region).copied()
    }

    pub fn row(&self, period: &str) -> Option<&BTreeMap<String, f64>> {
        self.cells.get(period)
    }

    pub fn periods(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> + '_ {
        self.cells.iter().map(|(p, row)| (p.as_str(), row))
    }

    pub fn latest_period(&self) -> Option<&str> {
        self.cells.keys().next_back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest and largest year found in the period tokens.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.periods().filter_map(range::period_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Keep only the periods accepted by `keep`.
    pub fn retain_periods<F>(&self, mut keep: F) -> Pivot
    where
        F: FnMut(&str) -> bool,
    {
        Pivot {
            cells: self
                .cells
                .iter()
                .filter(|(p, _)| keep(p))
                .map(|(p, row)| (p.clone(), row.clone()))
                .collect(),
        }
    }

    pub fn series(&self, regions: &[String]) -> Series {
        let labels: Vec<String> = self.cells.keys().cloned().collect();
        let columns = regions
            .iter()
            .map(|region| {
                let values = self
                    .cells
                    .values()
                    .map(|row| row.get(region).copied())
                    .collect();
                (region.clone(), values)
            })
            .collect();
        Series { labels, columns }
    }
}
