use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgRow, PgValueFormat};
use sqlx::types::BigDecimal;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A result row keyed by column name
///
/// Every query issued through a [`crate::db::Scope`] comes back in this
/// shape, so callers address columns by name rather than position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Decodes a Postgres row column by column
    pub fn from_row(row: &PgRow) -> AppResult<Self> {
        let mut fields = Map::with_capacity(row.columns().len());
        for column in row.columns() {
            let value = decode_column(row, column.ordinal(), column.type_info().name())
                .map_err(|e| match e {
                    AppError::Database(source) => AppError::Decode(format!(
                        "column '{}': {}",
                        column.name(),
                        source
                    )),
                    other => other,
                })?;
            fields.insert(column.name().to_string(), value);
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserializes one column into `T`
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> AppResult<T> {
        let value = self
            .fields
            .get(name)
            .ok_or_else(|| AppError::Decode(format!("missing column '{}'", name)))?;

        serde_json::from_value(value.clone())
            .map_err(|e| AppError::Decode(format!("column '{}': {}", name, e)))
    }

    /// Deserializes the whole record into a model keyed by field name
    pub fn into_model<T: DeserializeOwned>(self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| AppError::Decode(e.to_string()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn to_json<T: Serialize>(value: Option<T>) -> Value {
    value
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}

/// Maps one column onto a JSON value based on its Postgres type name
fn decode_column(row: &PgRow, index: usize, type_name: &str) -> AppResult<Value> {
    let value = match type_name {
        "BOOL" => to_json(row.try_get::<Option<bool>, _>(index)?),
        "INT2" => to_json(row.try_get::<Option<i16>, _>(index)?),
        "INT4" => to_json(row.try_get::<Option<i32>, _>(index)?),
        "INT8" => to_json(row.try_get::<Option<i64>, _>(index)?),
        "FLOAT4" => to_json(row.try_get::<Option<f32>, _>(index)?),
        "FLOAT8" => to_json(row.try_get::<Option<f64>, _>(index)?),
        "NUMERIC" => to_json(decode_numeric(row, index)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            to_json(row.try_get::<Option<String>, _>(index)?)
        }
        "TEXT[]" | "VARCHAR[]" => to_json(row.try_get::<Option<Vec<String>>, _>(index)?),
        "INT4[]" => to_json(row.try_get::<Option<Vec<i32>>, _>(index)?),
        "INT8[]" => to_json(row.try_get::<Option<Vec<i64>>, _>(index)?),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(index)?
            .unwrap_or(Value::Null),
        "UUID" => to_json(row.try_get::<Option<Uuid>, _>(index)?),
        "TIMESTAMPTZ" => to_json(row.try_get::<Option<DateTime<Utc>>, _>(index)?),
        "TIMESTAMP" => to_json(row.try_get::<Option<NaiveDateTime>, _>(index)?),
        "DATE" => to_json(row.try_get::<Option<NaiveDate>, _>(index)?),
        "VOID" => Value::Null,
        other => {
            return Err(AppError::Decode(format!(
                "unsupported column type {} at position {}",
                other, index
            )))
        }
    };
    Ok(value)
}

/// Decodes a NUMERIC as text at the value's own display scale
///
/// The binary wire format pads digits to base-10000 groups, so `12.50`
/// arrives as `12.5000`; the declared scale sits in the value header.
fn decode_numeric(row: &PgRow, index: usize) -> AppResult<Option<String>> {
    let Some(number) = row.try_get::<Option<BigDecimal>, _>(index)? else {
        return Ok(None);
    };

    let raw = row.try_get_raw(index)?;
    let scale = match raw.format() {
        PgValueFormat::Binary => raw.as_bytes().ok().and_then(display_scale),
        PgValueFormat::Text => None,
    };

    let number = match scale {
        Some(scale) => number.with_scale(scale),
        None => number,
    };
    Ok(Some(number.to_string()))
}

/// Reads `dscale` from a binary NUMERIC: ndigits, weight, sign, dscale
fn display_scale(bytes: &[u8]) -> Option<i64> {
    let header = bytes.get(6..8)?;
    Some(i64::from(u16::from_be_bytes([header[0], header[1]])))
}
