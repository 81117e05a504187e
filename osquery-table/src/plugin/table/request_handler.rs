/// Request dispatch for table plugins
use crate::call_context::CallContext;
use crate::error::TableError;
use crate::plugin::table::query_context::QueryContext;
use crate::plugin::table::row::serialize_row;
use crate::plugin::table::table_plugin::TablePlugin;
use crate::plugin::table::traits::RowDefinition;
use crate::wire::{ExtensionPluginRequest, ExtensionPluginResponse};

impl<R: RowDefinition> TablePlugin<R> {
    /// Handle one request from osquery.
    ///
    /// `columns` returns the route table, `generate` parses the query context,
    /// runs the generator and renders its rows. Any failure yields an error and
    /// no rows; the generator only runs once the request and its context are
    /// known to be valid.
    pub fn call(
        &self,
        ctx: &CallContext,
        req: &ExtensionPluginRequest,
    ) -> Result<ExtensionPluginResponse, TableError> {
        log::trace!("Table {} request: {req:?}", self.name());

        let Some(action) = req.get("action") else {
            log::warn!("Table {}: request without action", self.name());
            return Err(TableError::MissingAction);
        };

        match action.as_str() {
            "columns" => Ok(self.route_table()),
            "generate" => self.generate(ctx, req),
            _ => {
                log::warn!("Table {}: unknown action {action}", self.name());
                Err(TableError::UnknownAction(action.to_string()))
            }
        }
    }

    fn generate(
        &self,
        ctx: &CallContext,
        req: &ExtensionPluginRequest,
    ) -> Result<ExtensionPluginResponse, TableError> {
        // A missing context is decoded like an empty one, which is invalid JSON.
        let context = req.get("context").map(String::as_str).unwrap_or_default();
        let query = QueryContext::parse(context).map_err(|e| {
            log::warn!("Table {}: bad query context: {e}", self.name());
            TableError::from(e)
        })?;

        log::debug!(
            "Generating table {} with constraints on {} columns",
            self.name(),
            query.len()
        );

        let rows = self.generator().generate(ctx, &query).map_err(|e| {
            log::warn!("Table {}: generator failed: {e}", self.name());
            TableError::Generation(e.to_string())
        })?;

        rows.iter()
            .enumerate()
            .map(|(index, row)| serialize_row(row, self.columns(), index))
            .collect::<Result<ExtensionPluginResponse, TableError>>()
            .inspect_err(|e| log::error!("Table {}: {e}", self.name()))
    }
}
