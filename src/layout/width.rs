use super::LayoutError;
use super::index::ObjectiveIndex;
use crate::ir::RecordId;
use std::collections::HashMap;

/// Memoized subtree widths for a single pass.
///
/// Node width and gap are fixed for the pass, since the viewport cannot
/// change while a layout is being computed.
pub(crate) struct SubtreeWidths<'i, 'a> {
    index: &'i ObjectiveIndex<'a>,
    node_width: f32,
    gap: f32,
    max_depth: usize,
    memo: HashMap<RecordId, f32>,
}

impl<'i, 'a> SubtreeWidths<'i, 'a> {
    pub(crate) fn new(
        index: &'i ObjectiveIndex<'a>,
        node_width: f32,
        gap: f32,
        max_depth: usize,
    ) -> Self {
        Self {
            index,
            node_width,
            gap,
            max_depth,
            memo: HashMap::with_capacity(index.len()),
        }
    }

    pub(crate) fn node_width(&self) -> f32 {
        self.node_width
    }

    pub(crate) fn width(&mut self, id: RecordId) -> Result<f32, LayoutError> {
        self.width_at(id, 0)
    }

    fn width_at(&mut self, id: RecordId, depth: usize) -> Result<f32, LayoutError> {
        if let Some(value) = self.memo.get(&id) {
            return Ok(*value);
        }
        if depth > self.max_depth {
            return Err(LayoutError::DepthLimitExceeded {
                objective: id,
                limit: self.max_depth,
            });
        }
        let index = self.index;
        let children = index.children(id);
        let mut width = self.node_width;
        if !children.is_empty() {
            let mut total = 0.0;
            for child in children {
                total += self.width_at(*child, depth + 1)?;
            }
            total += self.gap * (children.len() as f32 - 1.0);
            width = width.max(total);
        }
        self.memo.insert(id, width);
        Ok(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrphanPolicy;
    use crate::ir::Objective;

    #[test]
    fn leaf_uses_node_width() {
        let objectives = vec![Objective::new(1, "leaf")];
        let index = ObjectiveIndex::build(&objectives, OrphanPolicy::Reject).unwrap();
        let mut widths = SubtreeWidths::new(&index, 220.0, 30.0, 64);
        assert_eq!(widths.width(RecordId(1)).unwrap(), 220.0);
    }

    #[test]
    fn children_sum_with_gaps_between_only() {
        let objectives = vec![
            Objective::new(1, "root"),
            Objective::new(2, "a").with_parent(1),
            Objective::new(3, "b").with_parent(1),
            Objective::new(4, "c").with_parent(1),
        ];
        let index = ObjectiveIndex::build(&objectives, OrphanPolicy::Reject).unwrap();
        let mut widths = SubtreeWidths::new(&index, 200.0, 30.0, 64);
        assert_eq!(widths.width(RecordId(1)).unwrap(), 3.0 * 200.0 + 2.0 * 30.0);
    }

    #[test]
    fn single_child_never_narrower_than_parent() {
        let objectives = vec![
            Objective::new(1, "root"),
            Objective::new(2, "only").with_parent(1),
            Objective::new(3, "x").with_parent(2),
            Objective::new(4, "y").with_parent(2),
        ];
        let index = ObjectiveIndex::build(&objectives, OrphanPolicy::Reject).unwrap();
        let mut widths = SubtreeWidths::new(&index, 160.0, 30.0, 64);
        let child = widths.width(RecordId(2)).unwrap();
        let root = widths.width(RecordId(1)).unwrap();
        assert_eq!(child, 350.0);
        assert_eq!(root, child);
    }

    #[test]
    fn depth_guard_trips_on_deep_chains() {
        let mut objectives = vec![Objective::new(0, "root")];
        for id in 1..10u64 {
            objectives.push(Objective::new(id, "step").with_parent(id - 1));
        }
        let index = ObjectiveIndex::build(&objectives, OrphanPolicy::Reject).unwrap();
        let mut widths = SubtreeWidths::new(&index, 160.0, 30.0, 4);
        assert_eq!(
            widths.width(RecordId(0)),
            Err(LayoutError::DepthLimitExceeded {
                objective: RecordId(5),
                limit: 4
            })
        );
    }
}
