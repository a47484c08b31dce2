use std::sync::{LazyLock, PoisonError, RwLock};

use bon::Builder;
use serde::{Deserialize, Serialize};

/// How many model levels field descriptions expand by default.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Tunables for field-description extraction.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeOptions {
    /// Number of model levels to expand. `1` lists only the top-level model's
    /// fields, `2` also lists the fields of models those fields hold, and so on.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub describe: DescribeOptions,
}

pub static GLOBAL_SETTINGS: LazyLock<RwLock<Option<Settings>>> =
    LazyLock::new(|| RwLock::new(None));

pub fn configure(describe: DescribeOptions) {
    let settings = Settings { describe };
    *GLOBAL_SETTINGS
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(settings);
}

/// Options from [`configure`], or the defaults when nothing was configured.
pub fn describe_options() -> DescribeOptions {
    GLOBAL_SETTINGS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|settings| settings.describe)
        .unwrap_or_default()
}
