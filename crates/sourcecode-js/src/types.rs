//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use sourcecode_browser::ComponentConfig;
use tsify_next::Tsify;

/// Partial configuration passed to `config()`. Missing fields keep their
/// current values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_type_min_lines: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ComponentConfig) {
        if let Some(tab_size) = self.tab_size {
            config.tab_size = tab_size;
        }
        if let Some(min_lines) = self.on_type_min_lines {
            config.on_type_min_lines = min_lines;
        }
    }
}

/// Full configuration as returned by `config()`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsConfig {
    pub tab_size: usize,
    pub on_type_min_lines: usize,
}

impl From<ComponentConfig> for JsConfig {
    fn from(config: ComponentConfig) -> Self {
        Self {
            tab_size: config.tab_size,
            on_type_min_lines: config.on_type_min_lines,
        }
    }
}
