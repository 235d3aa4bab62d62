use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Limits on turning a response into rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlatteningSettings {
    /// Rows produced from a single response before the result is truncated.
    #[serde(default = "max_rows_default")]
    pub max_rows: usize,
}

impl FlatteningSettings {
    pub fn is_default(&self) -> bool {
        self == &FlatteningSettings::default()
    }
}

impl Default for FlatteningSettings {
    fn default() -> FlatteningSettings {
        FlatteningSettings {
            max_rows: max_rows_default(),
        }
    }
}

fn max_rows_default() -> usize {
    100_000
}
