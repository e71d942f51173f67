use serde::{Deserialize, Serialize};
use std::path::Path;

/// How objectives whose parent id matches no objective are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OrphanPolicy {
    /// Fail the whole pass with `DanglingParentReference`.
    #[default]
    Reject,
    /// Drop the orphan and everything below it.
    Exclude,
    /// Lay the orphan out as an additional root.
    PromoteToRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Widths strictly below this are narrow.
    pub narrow_max_width: f32,
    /// Widths strictly below this (and not narrow) are medium.
    pub medium_max_width: f32,
    pub narrow_node_width: f32,
    pub medium_node_width: f32,
    pub wide_node_width: f32,
    pub narrow_spacing_scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            narrow_max_width: 640.0,
            medium_max_width: 1024.0,
            narrow_node_width: 160.0,
            medium_node_width: 200.0,
            wide_node_width: 220.0,
            narrow_spacing_scale: 0.9,
        }
    }
}

impl ViewportConfig {
    pub fn classify(&self, viewport_width: f32) -> ViewportClass {
        if viewport_width < self.narrow_max_width {
            ViewportClass::Narrow
        } else if viewport_width < self.medium_max_width {
            ViewportClass::Medium
        } else {
            ViewportClass::Wide
        }
    }

    pub fn node_width(&self, viewport_width: f32) -> f32 {
        match self.classify(viewport_width) {
            ViewportClass::Narrow => self.narrow_node_width,
            ViewportClass::Medium => self.medium_node_width,
            ViewportClass::Wide => self.wide_node_width,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub viewport: ViewportConfig,
    /// Horizontal gap between consecutive sibling subtrees and between roots.
    pub sibling_gap: f32,
    /// Left edge of the first root subtree.
    pub left_padding: f32,
    pub vertical_spacing: f32,
    pub collapsed_height: f32,
    /// Height used for an expanded node that reported no measured height.
    pub expanded_height: f32,
    /// Multiplier applied to the extra height of an expanded node.
    pub expansion_offset_factor: f32,
    /// Number of deeper levels that receive an expansion offset.
    pub offset_propagation_depth: usize,
    pub max_depth: usize,
    pub orphan_policy: OrphanPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            sibling_gap: 30.0,
            left_padding: 50.0,
            vertical_spacing: 150.0,
            collapsed_height: 100.0,
            expanded_height: 380.0,
            expansion_offset_factor: 1.5,
            offset_propagation_depth: 50,
            max_depth: 512,
            orphan_policy: OrphanPolicy::Reject,
        }
    }
}

impl LayoutConfig {
    pub fn node_width(&self, viewport_width: f32) -> f32 {
        self.viewport.node_width(viewport_width)
    }

    pub fn vertical_spacing_for(&self, viewport_width: f32) -> f32 {
        match self.viewport.classify(viewport_width) {
            ViewportClass::Narrow => self.vertical_spacing * self.viewport.narrow_spacing_scale,
            _ => self.vertical_spacing,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    narrow_max_width: Option<f32>,
    medium_max_width: Option<f32>,
    narrow_node_width: Option<f32>,
    medium_node_width: Option<f32>,
    wide_node_width: Option<f32>,
    narrow_spacing_scale: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    viewport: Option<ViewportConfigFile>,
    sibling_gap: Option<f32>,
    left_padding: Option<f32>,
    vertical_spacing: Option<f32>,
    collapsed_height: Option<f32>,
    expanded_height: Option<f32>,
    expansion_offset_factor: Option<f32>,
    offset_propagation_depth: Option<usize>,
    max_depth: Option<usize>,
    orphan_policy: Option<OrphanPolicy>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 override document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.narrow_max_width {
            config.viewport.narrow_max_width = v;
        }
        if let Some(v) = viewport.medium_max_width {
            config.viewport.medium_max_width = v;
        }
        if let Some(v) = viewport.narrow_node_width {
            config.viewport.narrow_node_width = v;
        }
        if let Some(v) = viewport.medium_node_width {
            config.viewport.medium_node_width = v;
        }
        if let Some(v) = viewport.wide_node_width {
            config.viewport.wide_node_width = v;
        }
        if let Some(v) = viewport.narrow_spacing_scale {
            config.viewport.narrow_spacing_scale = v;
        }
    }
    if let Some(v) = parsed.sibling_gap {
        config.sibling_gap = v;
    }
    if let Some(v) = parsed.left_padding {
        config.left_padding = v;
    }
    if let Some(v) = parsed.vertical_spacing {
        config.vertical_spacing = v;
    }
    if let Some(v) = parsed.collapsed_height {
        config.collapsed_height = v;
    }
    if let Some(v) = parsed.expanded_height {
        config.expanded_height = v;
    }
    if let Some(v) = parsed.expansion_offset_factor {
        config.expansion_offset_factor = v;
    }
    if let Some(v) = parsed.offset_propagation_depth {
        config.offset_propagation_depth = v;
    }
    if let Some(v) = parsed.max_depth {
        config.max_depth = v.max(1);
    }
    if let Some(v) = parsed.orphan_policy {
        config.orphan_policy = v;
    }
    // Levels past the depth limit never hold a node.
    config.offset_propagation_depth = config.offset_propagation_depth.min(config.max_depth);

    if config.viewport.medium_max_width < config.viewport.narrow_max_width {
        anyhow::bail!(
            "viewport.mediumMaxWidth ({}) must not be below viewport.narrowMaxWidth ({})",
            config.viewport.medium_max_width,
            config.viewport.narrow_max_width
        );
    }

    Ok(config)
}
