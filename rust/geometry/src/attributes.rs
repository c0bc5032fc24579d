// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-cell measurement attributes and their ingestion.
//!
//! Callers hand over drift cell information (drift time, hit size, ...) as
//! one record, a list of records, or a table. Every record is keyed by the
//! `sl`, `l` and `w` identifiers; the remaining fields become attributes of
//! the addressed [`Cell`](crate::Cell).
//!
//! ```rust,ignore
//! let info = CellInfo::from_json_str(r#"[{"sl": 1, "l": 1, "w": 10, "time": 300}]"#)?;
//! let report = station.set_cell_attrs(&info)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::station::Station;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Integral value usable as a super layer, layer or wire number.
    ///
    /// Doubles with no fractional part are accepted since tabular sources
    /// often widen integer columns.
    pub fn as_identifier(&self) -> Option<i32> {
        match self {
            AttrValue::Int(i) => i32::try_from(*i).ok(),
            AttrValue::Double(d)
                if d.is_finite()
                    && d.fract() == 0.0
                    && *d >= i32::MIN as f64
                    && *d <= i32::MAX as f64 =>
            {
                Some(*d as i32)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => f.write_str("null"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Double(d) => write!(f, "{d}"),
            AttrValue::String(s) => write!(f, "{s:?}"),
            AttrValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

/// Named attributes attached to a cell.
pub type Attributes = BTreeMap<String, AttrValue>;

/// One flat input record: `sl`, `l`, `w` plus arbitrary fields.
pub type Record = BTreeMap<String, AttrValue>;

/// Tabular cell information, column names plus rows of values.
///
/// Deserializes from the pandas `orient="split"` JSON layout
/// (`{"columns": [...], "index": [...], "data": [[...], ...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellTable {
    pub columns: Vec<String>,
    pub data: Vec<Vec<AttrValue>>,
}

impl CellTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            data: Vec::new(),
        }
    }

    /// Appends a row; its length is checked when the table is normalized.
    pub fn push_row(&mut self, row: Vec<AttrValue>) {
        self.data.push(row);
    }

    /// Rows as records, one per row.
    pub fn to_records(&self) -> Result<Vec<Record>> {
        self.data
            .iter()
            .enumerate()
            .map(|(row, values)| {
                if values.len() != self.columns.len() {
                    return Err(Error::RaggedTable {
                        row,
                        expected: self.columns.len(),
                        found: values.len(),
                    });
                }
                Ok(self
                    .columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect::<Record>())
            })
            .collect()
    }
}

/// Drift cell information in any of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInfo {
    Record(Record),
    Records(Vec<Record>),
    Table(CellTable),
}

impl CellInfo {
    /// Interprets dynamic JSON input.
    ///
    /// An object with `columns` and `data` keys is a table, any other object
    /// is a single record, an array is a list of records.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Object(map) if map.contains_key("columns") && map.contains_key("data") => {
                let table: CellTable = serde_json::from_value(value.clone())
                    .map_err(|e| Error::UnsupportedRecordShape(format!("table: {e}")))?;
                Ok(CellInfo::Table(table))
            }
            Value::Object(_) => Ok(CellInfo::Record(record_from_json(value, 0)?)),
            Value::Array(items) => Ok(CellInfo::Records(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| record_from_json(item, i))
                    .collect::<Result<_>>()?,
            )),
            other => Err(Error::UnsupportedRecordShape(format!(
                "expected an object, an array of objects or a table, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Parses JSON text, then interprets it like [`CellInfo::from_json`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidJson(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Normalizes every shape into an ordered list of owned records.
    ///
    /// The records are copies; the input is left untouched.
    pub fn records(&self) -> Result<Vec<Record>> {
        match self {
            CellInfo::Record(record) => Ok(vec![record.clone()]),
            CellInfo::Records(records) => Ok(records.clone()),
            CellInfo::Table(table) => table.to_records(),
        }
    }
}

impl From<Record> for CellInfo {
    fn from(record: Record) -> Self {
        CellInfo::Record(record)
    }
}

impl From<Vec<Record>> for CellInfo {
    fn from(records: Vec<Record>) -> Self {
        CellInfo::Records(records)
    }
}

impl From<CellTable> for CellInfo {
    fn from(table: CellTable) -> Self {
        CellInfo::Table(table)
    }
}

fn record_from_json(value: &serde_json::Value, index: usize) -> Result<Record> {
    let map = value.as_object().ok_or_else(|| {
        Error::UnsupportedRecordShape(format!(
            "record {index} must be an object, got {}",
            json_kind(value)
        ))
    })?;

    map.iter()
        .map(|(key, v)| {
            let attr: AttrValue = serde_json::from_value(v.clone()).map_err(|_| {
                Error::UnsupportedRecordShape(format!(
                    "record {index} field '{key}' is a nested object"
                ))
            })?;
            Ok((key.clone(), attr))
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `(super layer, layer, wire)` identifiers of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub super_layer: i32,
    pub layer: i32,
    pub wire: i32,
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SL{} L{} W{}", self.super_layer, self.layer, self.wire)
    }
}

/// Outcome of [`Station::set_cell_attrs`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Cells that received attributes, in record order.
    pub applied: Vec<CellAddress>,
    /// Records skipped because the addressed cell does not exist.
    pub skipped: Vec<CellAddress>,
}

struct KeyedRecord {
    address: CellAddress,
    values: Record,
}

fn take_identifier(record: &mut Record, index: usize, key: &'static str) -> Result<i32> {
    let value = record
        .remove(key)
        .ok_or(Error::MissingCellIdentifier { index, key })?;
    value
        .as_identifier()
        .ok_or_else(|| Error::InvalidCellIdentifier {
            index,
            key,
            value: value.to_string(),
        })
}

fn key_record(index: usize, mut record: Record) -> Result<KeyedRecord> {
    let super_layer = take_identifier(&mut record, index, "sl")?;
    let layer = take_identifier(&mut record, index, "l")?;
    let wire = take_identifier(&mut record, index, "w")?;
    Ok(KeyedRecord {
        address: CellAddress {
            super_layer,
            layer,
            wire,
        },
        values: record,
    })
}

impl Station {
    /// Assigns drift cell attributes from `info`.
    ///
    /// Every record is checked for its `sl`, `l` and `w` identifiers before
    /// any cell is touched, so a malformed record leaves the station as it
    /// was. Records addressing a cell that does not exist are skipped with a
    /// warning. Existing attributes with the same name are overwritten.
    pub fn set_cell_attrs(&mut self, info: &CellInfo) -> Result<IngestReport> {
        let keyed = info
            .records()?
            .into_iter()
            .enumerate()
            .map(|(index, record)| key_record(index, record))
            .collect::<Result<Vec<_>>>()?;

        let name = self.name();
        let mut report = IngestReport::default();

        for KeyedRecord { address, values } in keyed {
            let Some(super_layer) = self.super_layer_mut(address.super_layer) else {
                tracing::warn!(
                    super_layer = address.super_layer,
                    station = %name,
                    "Super layer does not exist in station, record skipped"
                );
                report.skipped.push(address);
                continue;
            };

            let Some(cell) = super_layer
                .layer_mut(address.layer)
                .and_then(|layer| layer.cell_mut(address.wire))
            else {
                tracing::warn!(
                    cell = %address,
                    station = %name,
                    "Cell does not exist in station, record skipped"
                );
                report.skipped.push(address);
                continue;
            };

            for (key, value) in values {
                cell.set_attr(key, value);
            }
            report.applied.push(address);
        }

        Ok(report)
    }
}
