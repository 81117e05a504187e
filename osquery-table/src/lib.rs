#![forbid(unsafe_code)]

pub mod call_context;
pub mod error;
pub mod extension;
pub mod plugin;
pub mod wire;

pub use crate::call_context::CallContext;
pub use crate::error::{HandlerError, ParseError, TableError};
pub use crate::extension::ExtensionHandler;

// Re-exports
pub use crate::wire::{
    ExtensionPluginRequest, ExtensionPluginResponse, ExtensionRegistry, ExtensionResponse,
    ExtensionStatus,
};

///
/// Expose all structures required to write a table plugin
///
/// ```
/// use osquery_table::prelude::*;
/// ```
pub mod prelude {
    pub use crate::plugin::{
        ColumnOptions, ColumnType, ConstraintList, Field, GenerateError, GenerateRows,
        OsqueryPlugin, Operator, QueryContext, RowDefinition, TablePlugin,
    };
    pub use crate::{CallContext, ExtensionHandler, TableError};
    pub use crate::{
        ExtensionPluginRequest, ExtensionPluginResponse, ExtensionResponse, ExtensionStatus,
    };
}
