pub(crate) mod column_def;
pub(crate) mod query_constraint;
pub(crate) mod query_context;
mod request_handler;
pub(crate) mod row;
pub(crate) mod table_plugin;
pub(crate) mod traits;

pub use column_def::ColumnType;
