// src/extract/types.rs

use std::collections::BTreeMap;

/// The `db.dsTypes.<name>` tag of a source record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Total,
    ByModel,
    ByBrand,
    Other(String),
}

impl DataType {
    /// Recognized data types, highest precedence first.
    pub const PRECEDENCE: [DataType; 3] = [DataType::Total, DataType::ByModel, DataType::ByBrand];

    pub fn from_token(token: &str) -> Self {
        match token {
            "ElectricCarsTotal" => DataType::Total,
            "ElectricCarsByModel" => DataType::ByModel,
            "ElectricCarsByBrand" => DataType::ByBrand,
            other => DataType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataType::Total => "ElectricCarsTotal",
            DataType::ByModel => "ElectricCarsByModel",
            DataType::ByBrand => "ElectricCarsByBrand",
            DataType::Other(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DataType::Other(_))
    }
}

/// A value from a record body. Only numbers take part in sums.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    Numeric(f64),
    Other,
}

impl From<&serde_json::Value> for BodyValue {
    fn from(v: &serde_json::Value) -> Self {
        match v.as_f64() {
            Some(n) => BodyValue::Numeric(n),
            None => BodyValue::Other,
        }
    }
}

/// One matched `db.insert(...)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub region: String,
    pub period: String,
    pub data_type: DataType,
    pub fields: Vec<(String, BodyValue)>,
}

impl RawRecord {
    pub fn numeric_sum(&self) -> f64 {
        self.fields
            .iter()
            .filter_map(|(_, v)| match v {
                BodyValue::Numeric(n) => Some(*n),
                BodyValue::Other => None,
            })
            .sum()
    }
}

/// Per-period sums keyed by data type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodRecord {
    pub sums: BTreeMap<DataType, f64>,
}

impl PeriodRecord {
    pub fn get(&self, data_type: &DataType) -> Option<f64> {
        self.sums.get(data_type).copied()
    }
}

/// The resolved sales figure for one region and period.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub period: String,
    pub value: f64,
}
