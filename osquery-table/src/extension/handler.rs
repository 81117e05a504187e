/// Extension handler for processing osquery requests
use crate::call_context::CallContext;
use crate::error::HandlerError;
use crate::extension::registry::RegistryManager;
use crate::plugin::{OsqueryPlugin, Registry};
use crate::wire::{ExtensionPluginRequest, ExtensionRegistry, ExtensionResponse, ExtensionStatus};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct ExtensionHandler {
    plugins: Vec<Arc<dyn OsqueryPlugin>>,
    registry: HashMap<Registry, BTreeMap<String, Arc<dyn OsqueryPlugin>>>,
    shutdown_flag: Arc<AtomicBool>,
}

impl ExtensionHandler {
    pub fn new(plugins: Vec<Arc<dyn OsqueryPlugin>>) -> Result<Self, HandlerError> {
        let mut registry: HashMap<Registry, BTreeMap<String, Arc<dyn OsqueryPlugin>>> =
            HashMap::new();

        for plugin in &plugins {
            let name = plugin.name();
            let slot = registry.entry(plugin.registry()).or_default();
            if slot.contains_key(&name) {
                return Err(HandlerError::DuplicatePlugin {
                    registry: plugin.registry().to_string(),
                    item: name,
                });
            }
            log::debug!("Registered plugin {} in registry {}", name, plugin.registry());
            slot.insert(name, Arc::clone(plugin));
        }

        Ok(ExtensionHandler {
            plugins,
            registry,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Route tables to announce when registering with osquery.
    pub fn extension_registry(&self) -> ExtensionRegistry {
        RegistryManager::generate_registry(&self.plugins)
    }

    /// Raised once osquery asks the extension to shut down. Every call
    /// context handed to plugins observes this flag.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_flag)
    }

    pub fn handle_ping(&self) -> ExtensionStatus {
        ExtensionStatus::ok()
    }

    pub fn handle_call(
        &self,
        registry: &str,
        item: &str,
        request: ExtensionPluginRequest,
    ) -> Result<ExtensionResponse, HandlerError> {
        log::trace!("Registry: {registry}");
        log::trace!("Item: {item}");
        log::trace!("Request: {request:?}");

        let kind = Registry::from_str(registry)
            .map_err(|_| HandlerError::UnknownRegistry(registry.to_string()))?;

        let plugin = self
            .registry
            .get(&kind)
            .and_then(|plugins| plugins.get(item))
            .ok_or_else(|| HandlerError::UnknownPlugin {
                registry: registry.to_string(),
                item: item.to_string(),
            })?;

        let ctx = CallContext::with_cancel_flag(self.shutdown_flag());
        Ok(plugin.handle_call(&ctx, request))
    }

    pub fn handle_shutdown(&self) {
        log::debug!("Shutdown RPC received from osquery");
        self.shutdown_flag.store(true, Ordering::Release);
        for plugin in &self.plugins {
            plugin.shutdown();
        }
    }
}
