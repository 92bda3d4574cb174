// src/pivot/stats.rs

use super::Pivot;

/// Summary figures for a (filtered) pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub latest_period: String,
    /// Sum over the selected regions for `latest_period`; missing cells count as zero.
    pub latest_total: f64,
    /// Selected region with the largest all-period total.
    pub top_region: Option<String>,
    pub top_region_total: f64,
    pub period_count: usize,
}

/// `None` for an empty pivot. Ties for the top region go to the region that
/// comes first in `regions`.
pub fn compute_stats(pivot: &Pivot, regions: &[String]) -> Option<Stats> {
    let latest_period = pivot.latest_period()?;

    let latest_total = regions
        .iter()
        .map(|r| pivot.get(latest_period, r).unwrap_or(0.0))
        .sum();

    let mut top: Option<(&String, f64)> = None;
    for region in regions {
        let total: f64 = pivot.iter().filter_map(|(_, row)| row.get(region)).sum();
        match top {
            Some((_, best)) if total <= best => {}
            _ => top = Some((region, total)),
        }
    }

    Some(Stats {
        latest_period: latest_period.to_string(),
        latest_total,
        top_region: top.map(|(r, _)| r.clone()),
        top_region_total: top.map_or(0.0, |(_, t)| t),
        period_count: pivot.len(),
    })
}
