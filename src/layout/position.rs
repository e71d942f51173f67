use super::flags::node_flags;
use super::index::ObjectiveIndex;
use super::width::SubtreeWidths;
use super::{ExpansionState, LayoutError, NodeId, PositionedNode, TreeEdge};
use crate::config::LayoutConfig;
use crate::ir::{LayoutContext, RecordId};

/// Places nodes in pre-order and records parent edges.
pub(crate) struct Positioner<'p, 'a> {
    index: &'p ObjectiveIndex<'a>,
    widths: SubtreeWidths<'p, 'a>,
    context: &'p LayoutContext,
    expansion: &'p ExpansionState,
    config: &'p LayoutConfig,
    vertical_spacing: f32,
    next_id: u32,
    /// Extra vertical displacement per depth, grown by expanded nodes.
    depth_offsets: Vec<f32>,
    nodes: Vec<PositionedNode<'a>>,
    edges: Vec<TreeEdge>,
}

impl<'p, 'a> Positioner<'p, 'a> {
    pub(crate) fn new(
        index: &'p ObjectiveIndex<'a>,
        context: &'p LayoutContext,
        expansion: &'p ExpansionState,
        config: &'p LayoutConfig,
    ) -> Self {
        let viewport_width = context.viewport_width;
        Self {
            index,
            widths: SubtreeWidths::new(
                index,
                config.node_width(viewport_width),
                config.sibling_gap,
                config.max_depth,
            ),
            context,
            expansion,
            config,
            vertical_spacing: config.vertical_spacing_for(viewport_width),
            next_id: 1,
            depth_offsets: Vec::new(),
            nodes: Vec::with_capacity(index.len()),
            edges: Vec::with_capacity(index.len()),
        }
    }

    /// Lays out every root left to right, starting at the left padding.
    pub(crate) fn place_roots(&mut self) -> Result<(), LayoutError> {
        let index = self.index;
        let mut start_x = self.config.left_padding;
        for root in index.roots() {
            self.place(*root, 0, start_x, None)?;
            start_x += self.widths.width(*root)? + self.config.sibling_gap;
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> (Vec<PositionedNode<'a>>, Vec<TreeEdge>) {
        (self.nodes, self.edges)
    }

    fn place(
        &mut self,
        id: RecordId,
        depth: usize,
        start_x: f32,
        parent: Option<NodeId>,
    ) -> Result<(), LayoutError> {
        if depth > self.config.max_depth {
            return Err(LayoutError::DepthLimitExceeded {
                objective: id,
                limit: self.config.max_depth,
            });
        }
        let index = self.index;
        let Some(objective) = index.get(id) else {
            return Ok(());
        };

        let subtree_width = self.widths.width(id)?;
        let node_width = self.widths.node_width();
        let x = start_x + subtree_width / 2.0 - node_width / 2.0;
        let y = depth as f32 * self.vertical_spacing + self.offset_at(depth);

        let node_id = NodeId(self.next_id);
        self.next_id += 1;

        let expanded_height = self
            .expansion
            .get(node_id)
            .filter(|entry| entry.expanded)
            .map(|entry| entry.height.unwrap_or(self.config.expanded_height));
        let height = expanded_height.unwrap_or(self.config.collapsed_height);
        if expanded_height.is_some() {
            let adjustment =
                (height - self.config.collapsed_height) * self.config.expansion_offset_factor;
            self.push_offset(depth, adjustment);
        }

        let children = index.children(id);
        let flags = node_flags(objective, self.context);
        self.nodes.push(PositionedNode {
            id: node_id,
            objective,
            parent,
            depth,
            x,
            y,
            width: node_width,
            height,
            expanded: expanded_height.is_some(),
            is_leaf: children.is_empty(),
            matches_filter: flags.matches_filter,
            matches_business_unit: flags.matches_business_unit,
            matches_assignee: flags.matches_assignee,
            assigned_to_viewer: flags.assigned_to_viewer,
            assigned_to_team: flags.assigned_to_team,
            assignees: flags.assignees,
        });
        if let Some(source) = parent {
            self.edges.push(TreeEdge {
                source,
                target: node_id,
            });
        }

        let mut child_x = start_x;
        for child in children {
            self.place(*child, depth + 1, child_x, Some(node_id))?;
            child_x += self.widths.width(*child)? + self.config.sibling_gap;
        }
        Ok(())
    }

    fn offset_at(&self, depth: usize) -> f32 {
        self.depth_offsets.get(depth).copied().unwrap_or(0.0)
    }

    /// Shifts every deeper level, up to the propagation bound.
    ///
    /// No node sits deeper than `max_depth` or the objective count, so levels
    /// past either are never read.
    fn push_offset(&mut self, depth: usize, adjustment: f32) {
        let last = depth
            .saturating_add(self.config.offset_propagation_depth)
            .min(self.config.max_depth)
            .min(self.index.len())
            .max(depth);
        if self.depth_offsets.len() <= last {
            self.depth_offsets.resize(last + 1, 0.0);
        }
        for offset in &mut self.depth_offsets[depth + 1..=last] {
            *offset += adjustment;
        }
    }
}
