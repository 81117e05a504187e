use crate::call_context::CallContext;
use crate::plugin::Registry;
use crate::wire::{
    ExtensionPluginRequest, ExtensionPluginResponse, ExtensionResponse, ExtensionStatus,
};

/// The interface osquery drives every extension plugin through.
#[cfg_attr(test, mockall::automock)]
pub trait OsqueryPlugin: Send + Sync {
    // Name is the name used to refer to the plugin (e.g. the name of the
    // table the plugin implements).
    fn name(&self) -> String;

    // Registry is which "registry" the plugin should be added to.
    fn registry(&self) -> Registry;

    // Routes returns detailed information about the interface exposed
    // by the plugin; for tables, one entry per column.
    fn routes(&self) -> ExtensionPluginResponse;

    // Ping implements the plugin's health check.
    fn ping(&self) -> ExtensionStatus;

    // Requests the plugin to perform its defined behavior. Errors are
    // reported in the response status, never as a panic.
    fn handle_call(&self, ctx: &CallContext, request: ExtensionPluginRequest) -> ExtensionResponse;

    // Shutdown notifies the plugin to stop.
    fn shutdown(&self);
}
