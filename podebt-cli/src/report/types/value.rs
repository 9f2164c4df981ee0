//! Spreadsheet cell value representation

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A value read from a workbook cell, used throughout the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// Null/empty cell
    Null,
    /// String value
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point (amounts, rates)
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
}

/// Excel serial dates count days from this epoch (the 1900 system,
/// including its historical leap-year offset).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Convert an Excel serial number to a calendar date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Date layouts accepted when a date arrives as text
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Datetime strings keep their date part
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    None
}

impl Value {
    /// Convert a calamine cell into a Value
    pub fn from_cell(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::String(s) if s.trim().is_empty() => Value::Null,
            Data::String(s) => Value::String(s.clone()),
            Data::Int(i) => Value::Int(*i),
            Data::Float(f) => Value::Float(*f),
            Data::Bool(b) => Value::Bool(*b),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(date) => Value::Date(date),
                None => Value::Null,
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => match parse_date_str(s) {
                Some(date) => Value::Date(date),
                None => Value::String(s.clone()),
            },
            Data::Error(_) => Value::Null,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a trimmed, non-empty string
    pub fn to_text(&self) -> Option<String> {
        let text = match self {
            Value::Null => return None,
            Value::String(s) => s.trim().to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    /// Coerce to a finite number, accepting numeric text
    pub fn to_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Coerce to a calendar date, accepting serials and date text
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_date_str(s),
            Value::Int(i) => excel_serial_to_date(*i as f64),
            Value::Float(f) => excel_serial_to_date(*f),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "(null)"),
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
