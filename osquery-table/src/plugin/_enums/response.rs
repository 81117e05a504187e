use crate::wire::{ExtensionPluginResponse, ExtensionResponse, ExtensionStatus};

/// Outcome of a plugin call, before it is put on the wire.
pub enum ExtensionResponseEnum {
    Rows(ExtensionPluginResponse),
    Failure(String),
}

impl From<ExtensionResponseEnum> for ExtensionResponse {
    fn from(value: ExtensionResponseEnum) -> Self {
        match value {
            ExtensionResponseEnum::Rows(rows) => ExtensionResponse::new(ExtensionStatus::ok(), rows),
            // Failed calls never carry partial rows.
            ExtensionResponseEnum::Failure(msg) => {
                ExtensionResponse::new(ExtensionStatus::new(1, msg, None), vec![])
            }
        }
    }
}
