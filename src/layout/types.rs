use crate::ir::{Objective, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sequential id assigned to a node during a layout pass, starting at 1.
///
/// Distinct from the objective id: it follows pre-order placement, so it is
/// stable across passes only while the objective list and its order are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeExpansion {
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// Per-node expand/collapse state, keyed by [`NodeId`].
///
/// Updates return a fresh map rather than mutating the current one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    entries: BTreeMap<NodeId, NodeExpansion>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeExpansion> {
        self.entries.get(&node)
    }

    pub fn is_expanded(&self, node: NodeId) -> bool {
        self.entries.get(&node).is_some_and(|entry| entry.expanded)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeExpansion)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn expanded(&self, node: NodeId, height: Option<f32>) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(
            node,
            NodeExpansion {
                expanded: true,
                height,
            },
        );
        Self { entries }
    }

    pub fn collapsed(&self, node: NodeId) -> Self {
        let mut entries = self.entries.clone();
        let height = entries.get(&node).and_then(|entry| entry.height);
        entries.insert(
            node,
            NodeExpansion {
                expanded: false,
                height,
            },
        );
        Self { entries }
    }

    /// Flips `node`; a supplied height replaces the remembered one.
    pub fn toggled(&self, node: NodeId, height: Option<f32>) -> Self {
        if self.is_expanded(node) {
            self.collapsed(node)
        } else {
            let height = height.or_else(|| self.entries.get(&node).and_then(|entry| entry.height));
            self.expanded(node, height)
        }
    }
}

impl FromIterator<(NodeId, NodeExpansion)> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeExpansion)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A placed objective.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedNode<'a> {
    pub id: NodeId,
    pub objective: &'a Objective,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Effective height: collapsed height, or the expanded height.
    pub height: f32,
    pub expanded: bool,
    pub is_leaf: bool,
    /// All active filters match (true when no filter is active).
    pub matches_filter: bool,
    pub matches_business_unit: bool,
    pub matches_assignee: bool,
    pub assigned_to_viewer: bool,
    pub assigned_to_team: bool,
    pub assignees: Vec<String>,
}

impl PositionedNode<'_> {
    pub fn objective_id(&self) -> RecordId {
        self.objective.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TreeEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl TreeEdge {
    pub fn id(&self) -> String {
        format!("e{}-{}", self.source, self.target)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout<'a> {
    /// Pre-order: every parent precedes its children.
    pub nodes: Vec<PositionedNode<'a>>,
    pub edges: Vec<TreeEdge>,
    pub width: f32,
    pub height: f32,
}

impl<'a> TreeLayout<'a> {
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode<'a>> {
        // Ids are dense and assigned in push order.
        let index = (id.0 as usize).checked_sub(1)?;
        self.nodes.get(index).filter(|node| node.id == id)
    }

    pub fn node_for_objective(&self, objective: RecordId) -> Option<&PositionedNode<'a>> {
        self.nodes.iter().find(|node| node.objective.id == objective)
    }

    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &PositionedNode<'a>> {
        self.nodes.iter().filter(move |node| node.parent == Some(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = &PositionedNode<'a>> {
        self.nodes.iter().filter(|node| node.parent.is_none())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
