use crate::ir::{LayoutContext, Objective};

/// Derived per-node flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeFlags {
    pub(crate) matches_filter: bool,
    pub(crate) matches_business_unit: bool,
    pub(crate) matches_assignee: bool,
    pub(crate) assigned_to_viewer: bool,
    pub(crate) assigned_to_team: bool,
    pub(crate) assignees: Vec<String>,
}

pub(crate) fn node_flags(objective: &Objective, context: &LayoutContext) -> NodeFlags {
    let matches_business_unit = context.filters.matches_business_unit(objective);
    let matches_assignee = context.filters.matches_assignee(objective);
    let assigned_to_viewer = context.viewer.as_ref().is_some_and(|viewer| {
        objective
            .assigned_users
            .iter()
            .any(|assigned| viewer.is_same_person(assigned))
    });
    let assigned_to_team = objective.assigned_users.iter().any(|assigned| {
        context
            .team_members
            .iter()
            .any(|member| member.id == assigned.id)
    });
    NodeFlags {
        matches_filter: matches_business_unit && matches_assignee,
        matches_business_unit,
        matches_assignee,
        assigned_to_viewer,
        assigned_to_team,
        assignees: assignee_names(objective, context),
    }
}

fn assignee_names(objective: &Objective, context: &LayoutContext) -> Vec<String> {
    objective
        .assigned_users
        .iter()
        .filter_map(|assigned| {
            assigned.name.clone().or_else(|| {
                context
                    .users
                    .iter()
                    .find(|user| user.id == assigned.id)
                    .and_then(|user| user.name.clone())
            })
        })
        .collect()
}
