//! Declared column types and value coercion
//!
//! Every output table has a fixed, declared schema. Raw JSON values are
//! coerced into the declared type of their column; a value that cannot be
//! coerced fails the record it belongs to.
//!
//! Numeric strings and integral floats in number columns are declared casts
//! (Recharge sends ids and money as strings). Any other change of JSON kind
//! is counted as a coercion in the run report.

use crate::decode::json_kind;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use serde_json::{Number, Value};
use std::sync::Arc;

/// Type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit integer, accepts integral numbers and numeric strings
    Int64,
    /// 64-bit float, accepts numbers and numeric strings
    Float64,
    /// Boolean, accepts booleans and "true"/"false"
    Boolean,
    /// String, accepts strings and scalar numbers/booleans
    Utf8,
    /// Any JSON value, stored as its JSON text
    Json,
    /// List of `{name, value}` pairs, kept nested
    Properties,
}

impl ColumnType {
    /// Arrow type the column is materialized as
    pub fn data_type(self) -> DataType {
        match self {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Boolean => DataType::Boolean,
            ColumnType::Utf8 | ColumnType::Json => DataType::Utf8,
            ColumnType::Properties => {
                let entry = Fields::from(vec![
                    Field::new("name", DataType::Utf8, true),
                    Field::new("value", DataType::Utf8, true),
                ]);
                DataType::List(Arc::new(Field::new("item", DataType::Struct(entry), true)))
            }
        }
    }

    /// Name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Int64 => "Int64",
            ColumnType::Float64 => "Float64",
            ColumnType::Boolean => "Boolean",
            ColumnType::Utf8 => "Utf8",
            ColumnType::Json => "Json",
            ColumnType::Properties => "Properties",
        }
    }

    /// Coerce a raw value into this type
    pub fn coerce(self, value: &Value) -> std::result::Result<Coerced, CoerceFailure> {
        if value.is_null() {
            return Ok(Coerced::kept(Value::Null));
        }

        match self {
            ColumnType::Int64 => coerce_int(value),
            ColumnType::Float64 => coerce_float(value),
            ColumnType::Boolean => coerce_bool(value),
            ColumnType::Utf8 => match value {
                Value::String(_) => Ok(Coerced::kept(value.clone())),
                Value::Number(_) | Value::Bool(_) => {
                    Ok(Coerced::coerced(Value::String(value.to_string())))
                }
                other => Err(CoerceFailure::Kind(json_kind(other))),
            },
            ColumnType::Json => match value {
                Value::String(_) => Ok(Coerced::kept(value.clone())),
                other => Ok(Coerced::kept(Value::String(other.to_string()))),
            },
            ColumnType::Properties => coerce_properties(value),
        }
    }
}

/// How a raw value was turned into its column value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Already the declared kind
    Kept,
    /// Declared numeric cast (numeric string or integral float)
    Cast,
    /// JSON kind changed outside the declared casts
    Coerced,
}

/// A column value and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    pub conversion: Conversion,
}

impl Coerced {
    fn kept(value: Value) -> Self {
        Self {
            value,
            conversion: Conversion::Kept,
        }
    }

    fn cast(value: Value) -> Self {
        Self {
            value,
            conversion: Conversion::Cast,
        }
    }

    fn coerced(value: Value) -> Self {
        Self {
            value,
            conversion: Conversion::Coerced,
        }
    }
}

/// Why a value could not be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceFailure {
    /// The JSON kind can never hold this type (e.g. an object for Int64)
    Kind(&'static str),
    /// The value has a plausible kind but does not parse (e.g. "abc" for Int64)
    Parse,
}

fn coerce_int(value: &Value) -> std::result::Result<Coerced, CoerceFailure> {
    match value {
        Value::Number(n) => {
            if n.is_i64() {
                return Ok(Coerced::kept(value.clone()));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(Coerced::cast(Value::from(f as i64)))
                }
                _ => Err(CoerceFailure::Parse),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| Coerced::cast(Value::from(i)))
            .map_err(|_| CoerceFailure::Parse),
        other => Err(CoerceFailure::Kind(json_kind(other))),
    }
}

fn coerce_float(value: &Value) -> std::result::Result<Coerced, CoerceFailure> {
    match value {
        Value::Number(_) => Ok(Coerced::kept(value.clone())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(|n| Coerced::cast(Value::Number(n)))
            .ok_or(CoerceFailure::Parse),
        other => Err(CoerceFailure::Kind(json_kind(other))),
    }
}

fn coerce_bool(value: &Value) -> std::result::Result<Coerced, CoerceFailure> {
    match value {
        Value::Bool(_) => Ok(Coerced::kept(value.clone())),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Coerced::coerced(Value::Bool(true))),
            "false" => Ok(Coerced::coerced(Value::Bool(false))),
            _ => Err(CoerceFailure::Parse),
        },
        other => Err(CoerceFailure::Kind(json_kind(other))),
    }
}

fn coerce_properties(value: &Value) -> std::result::Result<Coerced, CoerceFailure> {
    let Value::Array(items) = value else {
        return Err(CoerceFailure::Kind(json_kind(value)));
    };

    let mut changed = false;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(obj) = item else {
            return Err(CoerceFailure::Kind(json_kind(item)));
        };
        let mut entry = JsonObject::new();
        for key in ["name", "value"] {
            let text = match obj.get(key) {
                None | Some(Value::Null) => Value::Null,
                Some(Value::String(s)) => Value::String(s.clone()),
                Some(other) => {
                    changed = true;
                    Value::String(other.to_string())
                }
            };
            entry.insert(key.to_string(), text);
        }
        entries.push(Value::Object(entry));
    }

    let entries = Value::Array(entries);
    Ok(if changed {
        Coerced::coerced(entries)
    } else {
        Coerced::kept(entries)
    })
}

/// A declared output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}

/// Ordered set of declared output columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Create a schema from declared columns
    pub fn new(columns: &[ColumnSpec]) -> Self {
        Self {
            columns: columns.to_vec(),
        }
    }

    /// Declared columns in output order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Look up a column
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column is declared
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Arrow schema; every column is nullable
    pub fn to_arrow(&self) -> Schema {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name, c.ty.data_type(), true))
            .collect();
        Schema::new(fields)
    }
}

/// Identifies the record a row is being built from
#[derive(Debug, Clone, Copy)]
pub struct RowContext {
    pub record_type: &'static str,
    pub index: usize,
}

impl RowContext {
    /// Error for a missing key on a projection path
    pub fn missing(&self, path: impl Into<String>) -> Error {
        Error::FieldProjection {
            record_type: self.record_type,
            index: self.index,
            path: path.into(),
        }
    }

    /// Walk `rest` starting at the value of `root`
    ///
    /// An absent key anywhere on the path (or a scalar where an object is
    /// expected) fails; a `null` on the way projects to `null`.
    pub fn project(&self, root_name: &str, root: Option<&Value>, rest: &[&str]) -> Result<Value> {
        let full_path = || {
            std::iter::once(root_name)
                .chain(rest.iter().copied())
                .collect::<Vec<_>>()
                .join(".")
        };

        let mut current = root.ok_or_else(|| self.missing(full_path()))?;
        for key in rest {
            match current {
                Value::Null => return Ok(Value::Null),
                Value::Object(map) => {
                    current = map.get(*key).ok_or_else(|| self.missing(full_path()))?;
                }
                _ => return Err(self.missing(full_path())),
            }
        }
        Ok(current.clone())
    }
}

/// Accumulates one output row
#[derive(Debug)]
pub struct RowBuilder<'a> {
    schema: &'a TableSchema,
    ctx: RowContext,
    values: JsonObject,
    cast: usize,
    coerced: usize,
}

impl<'a> RowBuilder<'a> {
    /// Start an empty row
    pub fn new(schema: &'a TableSchema, ctx: RowContext) -> Self {
        Self {
            schema,
            ctx,
            values: JsonObject::new(),
            cast: 0,
            coerced: 0,
        }
    }

    /// Coerce `value` into the declared type of `column` and store it
    pub fn set(&mut self, column: &str, value: &Value) -> Result<()> {
        let spec = self
            .schema
            .column(column)
            .ok_or_else(|| Error::Other(format!("Column '{column}' is not declared")))?;

        let coerced = spec.ty.coerce(value).map_err(|failure| match failure {
            CoerceFailure::Kind(kind) => Error::SchemaMismatch {
                record_type: self.ctx.record_type,
                index: self.ctx.index,
                message: format!(
                    "column '{column}' is declared {} but got {kind}",
                    spec.ty.name()
                ),
            },
            CoerceFailure::Parse => Error::TypeCoercion {
                column: column.to_string(),
                target: spec.ty.name(),
                value: value.to_string(),
            },
        })?;

        match coerced.conversion {
            Conversion::Kept => {}
            Conversion::Cast => self.cast += 1,
            Conversion::Coerced => self.coerced += 1,
        }
        self.values.insert(column.to_string(), coerced.value);
        Ok(())
    }

    /// Copy a top-level field from an open bag; absent keys become null
    pub fn copy_from(&mut self, bag: &JsonObject, column: &str) -> Result<()> {
        self.set(column, bag.get(column).unwrap_or(&Value::Null))
    }

    /// Finish the row
    pub fn finish(self) -> BuiltRow {
        BuiltRow {
            values: self.values,
            cast: self.cast,
            coerced: self.coerced,
        }
    }
}

/// A completed row with its cast and coerced value counts
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRow {
    pub values: JsonObject,
    pub cast: usize,
    pub coerced: usize,
}
