/// Plugin registry generation for osquery registration
use crate::plugin::OsqueryPlugin;
use crate::wire::ExtensionRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds the registry structure osquery expects when an extension registers.
pub struct RegistryManager;

impl RegistryManager {
    /// Group plugin routes by registry type (table, config, logger), then by
    /// plugin name.
    pub fn generate_registry(plugins: &[Arc<dyn OsqueryPlugin>]) -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();

        for plugin in plugins {
            registry
                .entry(plugin.registry().to_string())
                .or_insert_with(BTreeMap::new)
                .insert(plugin.name(), plugin.routes());
        }

        registry
    }
}
