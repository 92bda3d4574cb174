// src/reconcile.rs

use crate::extract::{DataType, PeriodRecord};

/// Pick the single sales figure for a period: `Total`, else `ByModel`, else
/// `ByBrand`. The types describe the same quantity, so they are never added.
pub fn resolve(record: &PeriodRecord) -> Option<f64> {
    DataType::PRECEDENCE
        .iter()
        .find_map(|data_type| record.get(data_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(DataType, f64)]) -> PeriodRecord {
        PeriodRecord {
            sums: entries.iter().cloned().collect(),
        }
    }

    #[test]
    fn total_beats_everything() {
        let r = record(&[
            (DataType::ByBrand, 999.0),
            (DataType::ByModel, 120.0),
            (DataType::Total, 150.0),
        ]);
        assert_eq!(resolve(&r), Some(150.0));
    }

    #[test]
    fn by_model_beats_by_brand() {
        let r = record(&[(DataType::ByBrand, 999.0), (DataType::ByModel, 120.0)]);
        assert_eq!(resolve(&r), Some(120.0));
    }

    #[test]
    fn by_brand_is_the_fallback() {
        let r = record(&[(DataType::ByBrand, 7.0)]);
        assert_eq!(resolve(&r), Some(7.0));
    }

    #[test]
    fn zero_is_a_real_value() {
        let r = record(&[(DataType::Total, 0.0), (DataType::ByModel, 3.0)]);
        assert_eq!(resolve(&r), Some(0.0));
    }

    #[test]
    fn nothing_recognized_resolves_to_none() {
        let r = record(&[(DataType::Other("PluginHybridsTotal".into()), 5.0)]);
        assert_eq!(resolve(&r), None);
        assert_eq!(resolve(&PeriodRecord::default()), None);
    }
}
