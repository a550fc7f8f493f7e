use serde::Serialize;
use std::path::PathBuf;

use crate::cli::{GenerateArgs, GenerateDataArgs, InputArgs};

/// The command-line layer of the configuration.
///
/// Only flags the user actually passed are serialized, so unset flags never
/// mask values from the file or the environment.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl From<&InputArgs> for ConfigOverrides {
    fn from(args: &InputArgs) -> Self {
        Self {
            logs: args.logs.clone(),
            meta: args.meta.clone(),
            public_dir: None,
            pretty: args.pretty.then_some(true),
            strict: args.strict.then_some(true),
        }
    }
}

impl From<&GenerateArgs> for ConfigOverrides {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            public_dir: args.public_dir.clone(),
            ..Self::from(&args.input)
        }
    }
}

impl From<&GenerateDataArgs> for ConfigOverrides {
    fn from(args: &GenerateDataArgs) -> Self {
        Self::from(&args.input)
    }
}
