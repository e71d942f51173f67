use crate::ir::RecordId;
use thiserror::Error;

/// Reasons a layout pass is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("objective {objective} is part of a parent cycle")]
    CyclicReference { objective: RecordId },

    #[error("objective {objective} references missing parent {parent}")]
    DanglingParentReference { objective: RecordId, parent: RecordId },

    #[error("objective id {objective} appears more than once")]
    DuplicateObjective { objective: RecordId },

    #[error("objective {objective} sits deeper than the depth limit of {limit}")]
    DepthLimitExceeded { objective: RecordId, limit: usize },
}
