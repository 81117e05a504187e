//! Extension-side dispatch for osquery requests
//!
//! The transport that talks to osquery hands every request to an
//! [`ExtensionHandler`], which routes it to the registered plugin:
//!
//! - `handler`: plugin lookup by registry and name, ping and shutdown
//! - `registry`: route tables announced to osquery at registration

pub mod handler;
pub mod registry;

pub use handler::ExtensionHandler;
pub use registry::RegistryManager;
