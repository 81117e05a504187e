mod _enums;
mod _traits;
mod table;

// Re-exporting all public structures
pub use _enums::registry::Registry;

pub use _traits::osquery_plugin::OsqueryPlugin;

#[cfg(test)]
pub(crate) use _traits::osquery_plugin::MockOsqueryPlugin;

pub use table::column_def::{ColumnDef, ColumnOptions, ColumnType};
pub use table::query_constraint::{parse_constraint_list, Constraint, ConstraintList, Operator};
pub use table::query_context::{parse_query_context, QueryContext};
pub use table::row::{ColumnValue, Field};
pub use table::table_plugin::{TablePlugin, TablePluginBuilder};
pub use table::traits::{GenerateError, GenerateRows, RowDefinition};
