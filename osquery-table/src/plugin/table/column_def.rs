use bitflags::bitflags;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

// ColumnDef describes one column of a table plugin. Table plugins derive their
// column definitions from the row template, so these are rarely built by hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    t: ColumnType,
    o: ColumnOptions,
}

// The wire names double as osquery's column affinities, which is why the same
// enum is used to decode the `affinity` of a constraint list.
#[derive(Clone, Copy, Display, EnumString, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ColumnType {
    // TEXT: containing strings
    Text,
    // INTEGER: containing integers
    Integer,
    // BIGINT: containing large integers
    BigInt,
    // DOUBLE: containing floating point values
    Double,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ColumnOptions: u32 {
        const DEFAULT = 0;
        const INDEX = 1;
        const REQUIRED = 2;
        const ADDITIONAL = 4;
        const OPTIMIZED = 8;
        const HIDDEN = 16;
        const COLLATEBINARY = 32;
    }
}

impl Default for ColumnOptions {
    fn default() -> Self {
        ColumnOptions::DEFAULT
    }
}

impl ColumnDef {
    pub fn new(name: &str, t: ColumnType, o: ColumnOptions) -> Self {
        ColumnDef {
            name: name.to_owned(),
            t,
            o,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.t
    }

    pub fn options(&self) -> ColumnOptions {
        self.o
    }

    /// The route entry osquery expects for this column.
    pub(crate) fn route(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("id".to_string(), "column".to_string()),
            ("name".to_string(), self.name.clone()),
            ("type".to_string(), self.t.to_string()),
            ("op".to_string(), self.o.bits().to_string()),
        ])
    }
}
