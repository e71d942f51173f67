use super::LayoutError;
use crate::config::OrphanPolicy;
use crate::ir::{Objective, RecordId};
use std::collections::HashMap;
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnPath,
    Done,
}

/// Lookup tables built once per layout pass.
pub(crate) struct ObjectiveIndex<'a> {
    by_id: HashMap<RecordId, &'a Objective>,
    children: HashMap<RecordId, Vec<RecordId>>,
    roots: Vec<RecordId>,
}

impl<'a> ObjectiveIndex<'a> {
    pub(crate) fn build(
        objectives: &'a [Objective],
        policy: OrphanPolicy,
    ) -> Result<Self, LayoutError> {
        let mut by_id: HashMap<RecordId, &'a Objective> = HashMap::with_capacity(objectives.len());
        for objective in objectives {
            if by_id.insert(objective.id, objective).is_some() {
                return Err(LayoutError::DuplicateObjective {
                    objective: objective.id,
                });
            }
        }

        detect_cycles(objectives, &by_id)?;

        let mut children: HashMap<RecordId, Vec<RecordId>> = HashMap::new();
        let mut roots = Vec::new();
        let mut orphans = 0usize;
        for objective in objectives {
            let Some(parent) = objective.parent else {
                roots.push(objective.id);
                continue;
            };
            if by_id.contains_key(&parent) {
                children.entry(parent).or_default().push(objective.id);
                continue;
            }
            match policy {
                OrphanPolicy::Reject => {
                    return Err(LayoutError::DanglingParentReference {
                        objective: objective.id,
                        parent,
                    });
                }
                OrphanPolicy::Exclude => orphans += 1,
                OrphanPolicy::PromoteToRoot => {
                    orphans += 1;
                    roots.push(objective.id);
                }
            }
        }
        if orphans > 0 {
            warn!(orphans, ?policy, "objectives reference missing parents");
        }
        roots.sort_unstable();

        Ok(Self {
            by_id,
            children,
            roots,
        })
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<&'a Objective> {
        self.by_id.get(&id).copied()
    }

    /// Children in input order.
    pub(crate) fn children(&self, id: RecordId) -> &[RecordId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roots in ascending id order.
    pub(crate) fn roots(&self) -> &[RecordId] {
        &self.roots
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

fn detect_cycles(
    objectives: &[Objective],
    by_id: &HashMap<RecordId, &Objective>,
) -> Result<(), LayoutError> {
    let mut state: HashMap<RecordId, Visit> = HashMap::with_capacity(objectives.len());
    let mut path = Vec::new();
    for objective in objectives {
        let mut current = objective.id;
        loop {
            match state.get(&current) {
                Some(Visit::Done) => break,
                Some(Visit::OnPath) => {
                    return Err(LayoutError::CyclicReference { objective: current });
                }
                None => {}
            }
            state.insert(current, Visit::OnPath);
            path.push(current);
            match by_id.get(&current).and_then(|record| record.parent) {
                Some(parent) if by_id.contains_key(&parent) => current = parent,
                _ => break,
            }
        }
        for id in path.drain(..) {
            state.insert(id, Visit::Done);
        }
    }
    Ok(())
}
