use crate::error::SqlQueryError;
use crate::mysql_db::JsonRow;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

const ZERO_DATE: &str = "0000-00-00";

/// A column value as read off the wire, before it is turned into JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(String),
    String(String),
    Bytes(Vec<u8>),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Int(_) | Scalar::UInt(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Decimal(_) => "decimal",
            Scalar::Date(_) => "date",
            Scalar::DateTime(_) => "datetime",
            Scalar::Time(_) => "time",
            Scalar::String(_) => "str",
            Scalar::Bytes(_) => "bytes",
        }
    }

    /// Temporal values become ISO-8601 strings and decimals become
    /// (possibly lossy) floats. Values with no JSON counterpart are
    /// rejected.
    pub fn into_json(self) -> Result<Value, SqlQueryError> {
        let type_name = self.type_name();
        Ok(match self {
            Scalar::Null => Value::Null,
            Scalar::Int(value) => Value::from(value),
            Scalar::UInt(value) => Value::from(value),
            Scalar::Float(value) => float_to_json(value, type_name)?,
            Scalar::Decimal(text) => match text.parse::<f64>() {
                Ok(value) => float_to_json(value, type_name)?,
                Err(_) => return Err(unsupported(type_name)),
            },
            Scalar::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Scalar::DateTime(datetime) => Value::String(iso_datetime(&datetime)),
            Scalar::String(text) => Value::String(text),
            Scalar::Time(_) | Scalar::Bytes(_) => return Err(unsupported(type_name)),
        })
    }
}

fn unsupported(type_name: &str) -> SqlQueryError {
    SqlQueryError::Serialization {
        type_name: type_name.to_string(),
    }
}

fn float_to_json(value: f64, type_name: &str) -> Result<Value, SqlQueryError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| unsupported(type_name))
}

// Microseconds are only written when present, as `2024-01-02T03:04:05`
// or `2024-01-02T03:04:05.250000`.
fn iso_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.nanosecond() == 0 {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn decode_failed(err: sqlx::Error) -> SqlQueryError {
    SqlQueryError::Unexpected {
        message: err.to_string(),
    }
}

fn parse_failed(type_name: &str, text: &str) -> SqlQueryError {
    SqlQueryError::Unexpected {
        message: format!("Unable to parse {} value '{}'", type_name, text),
    }
}

/// Zero dates can't be represented and come back as `Null`.
pub fn parse_date(text: &str) -> Result<Scalar, SqlQueryError> {
    if text.starts_with(ZERO_DATE) {
        return Ok(Scalar::Null);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Scalar::Date)
        .map_err(|_| parse_failed("DATE", text))
}

pub fn parse_datetime(text: &str) -> Result<Scalar, SqlQueryError> {
    if text.starts_with(ZERO_DATE) {
        return Ok(Scalar::Null);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(Scalar::DateTime)
        .map_err(|_| parse_failed("DATETIME", text))
}

/// Read column `index` of a text-protocol row, dispatching on the
/// column's declared MySQL type.
pub fn decode_value(row: &MySqlRow, index: usize) -> Result<Scalar, SqlQueryError> {
    if row.try_get_raw(index).map_err(decode_failed)?.is_null() {
        return Ok(Scalar::Null);
    }

    let type_name = row.column(index).type_info().name();
    let text = || row.try_get_unchecked::<String, _>(index).map_err(decode_failed);
    Ok(match type_name {
        "NULL" => Scalar::Null,
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Scalar::Int(row.try_get_unchecked(index).map_err(decode_failed)?)
        }
        name if name.ends_with("INT UNSIGNED") => {
            Scalar::UInt(row.try_get_unchecked(index).map_err(decode_failed)?)
        }
        "FLOAT" | "DOUBLE" => Scalar::Float(row.try_get_unchecked(index).map_err(decode_failed)?),
        "DECIMAL" => Scalar::Decimal(text()?),
        "DATE" => parse_date(&text()?)?,
        "DATETIME" | "TIMESTAMP" => parse_datetime(&text()?)?,
        "TIME" => Scalar::Time(text()?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => Scalar::Bytes(row.try_get_unchecked(index).map_err(decode_failed)?),
        _ => {
            let bytes: Vec<u8> = row.try_get_unchecked(index).map_err(decode_failed)?;
            match String::from_utf8(bytes) {
                Ok(text) => Scalar::String(text),
                Err(err) => Scalar::Bytes(err.into_bytes()),
            }
        }
    })
}

/// Normalize a row into a JSON object whose keys follow the column order.
pub fn decode_row(row: &MySqlRow) -> Result<JsonRow, SqlQueryError> {
    let mut json_row = JsonRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index)?.into_json()?;
        json_row.insert(column.name().to_string(), value);
    }
    Ok(json_row)
}
