use strum_macros::{EnumString, VariantNames};

/// The osquery registries an extension can add plugins to.
#[derive(EnumString, VariantNames, Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[strum(serialize_all = "kebab_case")]
pub enum Registry {
    Config,
    Logger,
    Table,
}

impl Registry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Config => "config",
            Registry::Logger => "logger",
            Registry::Table => "table",
        }
    }
}

use std::fmt;

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
