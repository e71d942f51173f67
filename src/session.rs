//! Stateful owner of one tree view.
//!
//! The view's inputs change through [`SessionEvent`]s that are handed to
//! [`TreeSession::apply`] directly by whoever raised them. Every change
//! replaces the affected state and the next [`TreeSession::layout`] call
//! recomputes from scratch.

use crate::config::LayoutConfig;
use crate::ir::{Filters, LayoutContext, LayoutRequest, Objective};
use crate::layout::{ExpansionState, LayoutError, NodeId, TreeLayout, compute_layout};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Expand or collapse a node; `height` is the measured expanded height.
    ToggleNode { node: NodeId, height: Option<f32> },
    SetFilters(Filters),
    /// A fresh fetch replaced the objective list.
    ReplaceObjectives(Vec<Objective>),
    ResizeViewport(f32),
    CollapseAll,
}

#[derive(Debug, Clone)]
pub struct TreeSession {
    objectives: Vec<Objective>,
    context: LayoutContext,
    expansion: ExpansionState,
    config: LayoutConfig,
}

impl TreeSession {
    pub fn new(objectives: Vec<Objective>, context: LayoutContext, config: LayoutConfig) -> Self {
        Self {
            objectives,
            context,
            expansion: ExpansionState::new(),
            config,
        }
    }

    pub fn from_request(request: LayoutRequest, config: LayoutConfig) -> Self {
        Self {
            objectives: request.objectives,
            context: request.context,
            expansion: request.expansion,
            config,
        }
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Applies `event`; returns whether a relayout is needed.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::ToggleNode { node, height } => {
                self.expansion = self.expansion.toggled(node, height);
                debug!(%node, expanded = self.expansion.is_expanded(node), "node toggled");
                true
            }
            SessionEvent::SetFilters(filters) => {
                if self.context.filters == filters {
                    return false;
                }
                self.context.filters = filters;
                true
            }
            SessionEvent::ReplaceObjectives(objectives) => {
                // Node ids are positional; remembered expansions would land on other objectives.
                self.objectives = objectives;
                self.expansion = ExpansionState::new();
                true
            }
            SessionEvent::ResizeViewport(width) => {
                let config = &self.config.viewport;
                let changed = config.classify(width) != config.classify(self.context.viewport_width);
                self.context.viewport_width = width;
                changed
            }
            SessionEvent::CollapseAll => {
                if self.expansion.is_empty() {
                    return false;
                }
                self.expansion = ExpansionState::new();
                true
            }
        }
    }

    pub fn layout(&self) -> Result<TreeLayout<'_>, LayoutError> {
        compute_layout(&self.objectives, &self.context, &self.expansion, &self.config)
    }
}
