// src/export.rs

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::error::{EvError, EvResult};
use crate::pivot::Pivot;
use crate::regions::label;

/// Shown in place of an absent cell.
pub const MISSING_CELL: &str = "–";

/// Plain number text: `21415` rather than `21415.0`.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// en-US style grouping with at most three fraction digits: `1,234,567.5`.
pub fn format_grouped(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Header row plus one row per period, in period order.
pub fn table_rows(pivot: &Pivot, regions: &[String]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(pivot.len() + 1);
    let mut header = vec!["period".to_string()];
    header.extend(regions.iter().map(|r| label(r).to_string()));
    rows.push(header);

    for (period, cells) in pivot.iter() {
        let mut row = vec![period.to_string()];
        row.extend(
            regions
                .iter()
                .map(|r| cells.get(r).map(|v| format_value(*v)).unwrap_or_default()),
        );
        rows.push(row);
    }
    rows
}

/// Comma-separated export; a field is quoted only when it holds a comma,
/// a quote or a line break.
pub fn to_csv(pivot: &Pivot, regions: &[String]) -> EvResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in table_rows(pivot, regions) {
        wtr.write_record(&row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| EvError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_csv(path: impl AsRef<Path>, pivot: &Pivot, regions: &[String]) -> EvResult<()> {
    let path = path.as_ref();
    let text = to_csv(pivot, regions)?;
    std::fs::write(path, text)?;
    info!(path = %path.display(), periods = pivot.len(), "wrote csv export");
    Ok(())
}

/// Fixed-width text table with region labels and grouped numbers.
pub fn render_table(pivot: &Pivot, regions: &[String]) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(pivot.len() + 1);
    let mut header = vec!["Period".to_string()];
    header.extend(regions.iter().map(|r| label(r).to_string()));
    grid.push(header);
    for (period, cells) in pivot.iter() {
        let mut row = vec![period.to_string()];
        row.extend(regions.iter().map(|r| match cells.get(r) {
            Some(v) => format_grouped(*v),
            None => MISSING_CELL.to_string(),
        }));
        grid.push(row);
    }

    let cols = grid[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| grid.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &grid {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                if c == 0 {
                    format!("{:<w$}", cell, w = widths[c])
                } else {
                    format!("{:>w$}", cell, w = widths[c])
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}
