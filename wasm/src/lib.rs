use okr_tree_layout::{LayoutConfig, LayoutDump, LayoutRequest, compute_layout, parse_config};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeLayoutOptions {
    /// JSON5 override document, same shape as the CLI config file.
    config: Option<String>,
    viewport_width: Option<f32>,
}

fn build_config(options: &TreeLayoutOptions) -> Result<LayoutConfig, String> {
    match options.config.as_deref() {
        Some(raw) => parse_config(raw).map_err(|error| error.to_string()),
        None => Ok(LayoutConfig::default()),
    }
}

fn layout_to_json(request_json: &str, options: TreeLayoutOptions) -> Result<String, String> {
    let mut request: LayoutRequest =
        serde_json::from_str(request_json).map_err(|error| error.to_string())?;
    if let Some(width) = options.viewport_width {
        request.context.viewport_width = width;
    }
    let config = build_config(&options)?;
    let layout = compute_layout(
        &request.objectives,
        &request.context,
        &request.expansion,
        &config,
    )
    .map_err(|error| error.to_string())?;
    serde_json::to_string(&LayoutDump::from_layout(&layout)).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_okr_tree(request_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TreeLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TreeLayoutOptions::default()
    };
    layout_to_json(request_json, options).map_err(|error| JsValue::from_str(&error))
}
