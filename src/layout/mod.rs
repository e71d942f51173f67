//! Hierarchical layout of an objective tree.
//!
//! A pass runs in three steps:
//!
//! 1. Index the flat objective list (id lookup, parent to children, sorted
//!    roots) and reject duplicates, parent cycles and, depending on the
//!    [`OrphanPolicy`](crate::config::OrphanPolicy), dangling parents.
//! 2. Compute each subtree's horizontal span: a leaf takes one node width,
//!    an inner node the larger of its own width and its children's spans
//!    plus the sibling gaps.
//! 3. Walk the trees in pre-order, centering every node over its span and
//!    pushing deeper levels down when a node is expanded.
//!
//! Passes are all-or-nothing: any error discards the partial result.

mod error;
mod flags;
mod index;
mod position;
mod types;
mod width;

pub use error::LayoutError;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{LayoutContext, Objective};
use index::ObjectiveIndex;
use position::Positioner;
use tracing::debug;

pub fn compute_layout<'a>(
    objectives: &'a [Objective],
    context: &LayoutContext,
    expansion: &ExpansionState,
    config: &LayoutConfig,
) -> Result<TreeLayout<'a>, LayoutError> {
    if objectives.is_empty() {
        return Ok(TreeLayout::default());
    }

    let index = ObjectiveIndex::build(objectives, config.orphan_policy)?;
    let mut positioner = Positioner::new(&index, context, expansion, config);
    positioner.place_roots()?;
    let (nodes, edges) = positioner.finish();

    let mut max_x = 0.0_f32;
    let mut max_y = 0.0_f32;
    for node in &nodes {
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    let width = if nodes.is_empty() {
        0.0
    } else {
        max_x + config.left_padding
    };

    debug!(
        objectives = objectives.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        viewport_width = context.viewport_width,
        "tree layout computed"
    );

    Ok(TreeLayout {
        nodes,
        edges,
        width,
        height: max_y,
    })
}
