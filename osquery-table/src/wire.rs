//! Message shapes exchanged with osquery over the extension protocol.
//!
//! These mirror the extension API structures one-to-one so a transport can
//! move them on and off the socket without any translation.

use std::collections::BTreeMap;

/// A single request sent by osquery to a plugin, e.g. `{"action": "generate", "context": "{...}"}`.
pub type ExtensionPluginRequest = BTreeMap<String, String>;

/// Rows (or route entries) returned to osquery.
pub type ExtensionPluginResponse = Vec<BTreeMap<String, String>>;

/// Plugin name to routes, for one registry.
pub type ExtensionRouteTable = BTreeMap<String, ExtensionPluginResponse>;

/// Registry name to route table, sent to osquery when registering the extension.
pub type ExtensionRegistry = BTreeMap<String, ExtensionRouteTable>;

pub type ExtensionRouteUUID = i64;

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExtensionStatus {
    pub code: Option<i32>,
    pub message: Option<String>,
    pub uuid: Option<ExtensionRouteUUID>,
}

impl ExtensionStatus {
    pub fn new<F1, F2, F3>(code: F1, message: F2, uuid: F3) -> ExtensionStatus
    where
        F1: Into<Option<i32>>,
        F2: Into<Option<String>>,
        F3: Into<Option<ExtensionRouteUUID>>,
    {
        ExtensionStatus {
            code: code.into(),
            message: message.into(),
            uuid: uuid.into(),
        }
    }

    /// The canonical healthy status: code 0, message "OK".
    pub fn ok() -> ExtensionStatus {
        ExtensionStatus::new(0, "OK".to_string(), None)
    }
}

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExtensionResponse {
    pub status: Option<ExtensionStatus>,
    pub response: Option<ExtensionPluginResponse>,
}

impl ExtensionResponse {
    pub fn new<F1, F2>(status: F1, response: F2) -> ExtensionResponse
    where
        F1: Into<Option<ExtensionStatus>>,
        F2: Into<Option<ExtensionPluginResponse>>,
    {
        ExtensionResponse {
            status: status.into(),
            response: response.into(),
        }
    }
}
