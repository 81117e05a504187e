/// Typed row values and their rendering into osquery's string-keyed rows
use crate::error::TableError;
use crate::plugin::table::column_def::{ColumnDef, ColumnOptions, ColumnType};
use crate::plugin::table::traits::RowDefinition;
use std::collections::BTreeMap;

/// A single typed cell. Each variant corresponds to one osquery column type.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
}

impl ColumnValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValue::Text(_) => ColumnType::Text,
            ColumnValue::Integer(_) => ColumnType::Integer,
            ColumnValue::BigInt(_) => ColumnType::BigInt,
            ColumnValue::Double(_) => ColumnType::Double,
        }
    }

    /// Textual form sent to osquery. Doubles use the shortest representation
    /// that parses back to the same value. NaN and infinities have no SQLite
    /// literal and render as the empty string, which osquery reads as NULL.
    pub fn render(&self) -> String {
        match self {
            ColumnValue::Text(s) => s.clone(),
            ColumnValue::Integer(i) => i.to_string(),
            ColumnValue::BigInt(i) => i.to_string(),
            ColumnValue::Double(d) if d.is_finite() => d.to_string(),
            ColumnValue::Double(_) => String::new(),
        }
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Integer(i32::from(value))
    }
}

impl From<i32> for ColumnValue {
    fn from(value: i32) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<u16> for ColumnValue {
    fn from(value: u16) -> Self {
        ColumnValue::Integer(i32::from(value))
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::BigInt(value)
    }
}

impl From<u32> for ColumnValue {
    fn from(value: u32) -> Self {
        ColumnValue::BigInt(i64::from(value))
    }
}

impl From<f32> for ColumnValue {
    fn from(value: f32) -> Self {
        ColumnValue::Double(f64::from(value))
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Double(value)
    }
}

/// One named column of a row, as declared by [`RowDefinition::fields`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    value: ColumnValue,
    options: ColumnOptions,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options: ColumnOptions::DEFAULT,
        }
    }

    /// Column options advertised to osquery. Only the template row's options
    /// are read.
    pub fn with_options(mut self, options: ColumnOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ColumnValue {
        &self.value
    }

    pub fn options(&self) -> ColumnOptions {
        self.options
    }
}

/// Derive the column schema from a template row. Values are ignored, only
/// names, types and options are kept, in declaration order.
pub fn derive_schema<R: RowDefinition>(template: &R) -> Result<Vec<ColumnDef>, TableError> {
    let fields = template.fields();
    if fields.is_empty() {
        return Err(TableError::Construction(
            "row definition declares no columns".to_string(),
        ));
    }

    let mut columns: Vec<ColumnDef> = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(TableError::Construction(format!(
                "field {index} has an empty column name"
            )));
        }
        if columns.iter().any(|c| c.name() == field.name) {
            return Err(TableError::Construction(format!(
                "duplicate column name: {}",
                field.name
            )));
        }

        columns.push(ColumnDef::new(
            &field.name,
            field.value.column_type(),
            field.options,
        ));
    }

    Ok(columns)
}

/// Render one row against the schema. `row_index` is only used for error
/// reporting.
pub fn serialize_row<R: RowDefinition>(
    row: &R,
    columns: &[ColumnDef],
    row_index: usize,
) -> Result<BTreeMap<String, String>, TableError> {
    let contract = |reason: String| TableError::RowContract {
        row: row_index,
        reason,
    };

    let fields = row.fields();
    if fields.len() != columns.len() {
        return Err(contract(format!(
            "expected {} fields, got {}",
            columns.len(),
            fields.len()
        )));
    }

    let mut out = BTreeMap::new();
    for (column, field) in columns.iter().zip(fields) {
        if column.name() != field.name {
            return Err(contract(format!(
                "expected column {}, got {}",
                column.name(),
                field.name
            )));
        }
        if column.column_type() != field.value.column_type() {
            return Err(contract(format!(
                "column {} is {}, got a {} value",
                column.name(),
                column.column_type(),
                field.value.column_type()
            )));
        }

        out.insert(field.name, field.value.render());
    }

    Ok(out)
}
