/// TablePlugin and its builder
use crate::call_context::CallContext;
use crate::error::TableError;
use crate::plugin::_enums::response::ExtensionResponseEnum;
use crate::plugin::table::column_def::ColumnDef;
use crate::plugin::table::query_context::QueryContext;
use crate::plugin::table::row::derive_schema;
use crate::plugin::table::traits::{GenerateError, GenerateRows, RowDefinition};
use crate::plugin::{OsqueryPlugin, Registry};
use crate::wire::{
    ExtensionPluginRequest, ExtensionPluginResponse, ExtensionResponse, ExtensionStatus,
};
use std::sync::Arc;

/// A read-only osquery table backed by typed rows of type `R`.
///
/// The column schema is derived once from a template row when the plugin is
/// built and shared, immutable, by every call. Cloning is cheap.
pub struct TablePlugin<R: RowDefinition> {
    name: String,
    columns: Arc<[ColumnDef]>,
    generator: Arc<dyn GenerateRows<R>>,
}

impl<R: RowDefinition> Clone for TablePlugin<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            columns: Arc::clone(&self.columns),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<R: RowDefinition> TablePlugin<R> {
    /// Build a table from a name, a template row (its values are discarded)
    /// and a generator closure.
    pub fn new<F>(name: &str, template: R, generator: F) -> Result<Self, TableError>
    where
        F: Fn(&CallContext, &QueryContext) -> Result<Vec<R>, GenerateError>
            + Send
            + Sync
            + 'static,
    {
        Self::builder(name)
            .template(template)
            .generator(generator)
            .build()
    }

    pub fn builder(name: &str) -> TablePluginBuilder<R> {
        TablePluginBuilder {
            name: name.to_string(),
            template: None,
            generator: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the osquery registry table plugins live in.
    pub fn registry_name(&self) -> &'static str {
        Registry::Table.as_str()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub(crate) fn generator(&self) -> &dyn GenerateRows<R> {
        self.generator.as_ref()
    }

    pub(crate) fn route_table(&self) -> ExtensionPluginResponse {
        self.columns.iter().map(ColumnDef::route).collect()
    }
}

pub struct TablePluginBuilder<R: RowDefinition> {
    name: String,
    template: Option<R>,
    generator: Option<Arc<dyn GenerateRows<R>>>,
}

impl<R: RowDefinition> TablePluginBuilder<R> {
    /// Row whose fields define the table schema.
    pub fn template(mut self, row: R) -> Self {
        self.template = Some(row);
        self
    }

    pub fn generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&CallContext, &QueryContext) -> Result<Vec<R>, GenerateError>
            + Send
            + Sync
            + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Like [`generator`](Self::generator), for types implementing [`GenerateRows`].
    pub fn source<G: GenerateRows<R>>(mut self, source: G) -> Self {
        self.generator = Some(Arc::new(source));
        self
    }

    pub fn build(self) -> Result<TablePlugin<R>, TableError> {
        if self.name.is_empty() {
            return Err(TableError::Construction(
                "table name must not be empty".to_string(),
            ));
        }
        let Some(template) = self.template else {
            return Err(TableError::Construction(format!(
                "table {} has no row template",
                self.name
            )));
        };
        let Some(generator) = self.generator else {
            return Err(TableError::Construction(format!(
                "table {} has no generator",
                self.name
            )));
        };

        let columns = derive_schema(&template)?;
        log::debug!(
            "Table {} defined with {} columns",
            self.name,
            columns.len()
        );

        Ok(TablePlugin {
            name: self.name,
            columns: columns.into(),
            generator,
        })
    }
}

impl<R: RowDefinition> OsqueryPlugin for TablePlugin<R> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn registry(&self) -> Registry {
        Registry::Table
    }

    fn routes(&self) -> ExtensionPluginResponse {
        self.route_table()
    }

    fn ping(&self) -> ExtensionStatus {
        ExtensionStatus::ok()
    }

    fn handle_call(&self, ctx: &CallContext, request: ExtensionPluginRequest) -> ExtensionResponse {
        match self.call(ctx, &request) {
            Ok(rows) => ExtensionResponseEnum::Rows(rows).into(),
            Err(e) => ExtensionResponseEnum::Failure(e.to_string()).into(),
        }
    }

    fn shutdown(&self) {
        log::trace!("Shutting down table plugin: {}", self.name);
    }
}
