use std::collections::HashMap;
use std::path::{Path, PathBuf};

use okr_tree_layout::{
    ExpansionState, Filters, LayoutConfig, LayoutContext, LayoutError, LayoutRequest, NodeId,
    Objective, OrphanPolicy, PositionedNode, RecordId, TreeLayout, compute_layout,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_request(name: &str) -> LayoutRequest {
    let raw = std::fs::read_to_string(fixture_path(name)).expect("fixture read failed");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("fixture is not JSON");
    if value.is_array() {
        LayoutRequest {
            objectives: serde_json::from_value(value).expect("objectives parse failed"),
            ..LayoutRequest::default()
        }
    } else {
        serde_json::from_value(value).expect("request parse failed")
    }
}

fn layout_of<'a>(request: &'a LayoutRequest, config: &LayoutConfig) -> TreeLayout<'a> {
    compute_layout(
        &request.objectives,
        &request.context,
        &request.expansion,
        config,
    )
    .expect("layout failed")
}

/// Node count, edge count, and parents placed before children.
fn assert_tree_invariants(layout: &TreeLayout<'_>, expected_nodes: usize, fixture: &str) {
    let roots = layout.roots().count();
    assert_eq!(layout.nodes.len(), expected_nodes, "{fixture}: node count");
    assert_eq!(
        layout.edges.len(),
        expected_nodes - roots,
        "{fixture}: edge count"
    );

    let position: HashMap<NodeId, usize> = layout
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx))
        .collect();
    for node in &layout.nodes {
        let Some(parent) = node.parent else {
            continue;
        };
        assert!(
            position[&parent] < position[&node.id],
            "{fixture}: parent {parent} placed after child {}",
            node.id
        );
        let edge = layout
            .edges
            .iter()
            .find(|edge| edge.target == node.id)
            .expect("edge for non-root node");
        assert_eq!(edge.source, parent, "{fixture}: edge source");
        let parent_objective = layout.node(parent).map(|p| p.objective.id);
        assert_eq!(parent_objective, node.objective.parent, "{fixture}: parent link");
    }
}

#[test]
fn fixtures_satisfy_tree_invariants() {
    let exclude = LayoutConfig {
        orphan_policy: OrphanPolicy::Exclude,
        ..LayoutConfig::default()
    };
    let cases = [
        ("basic.json", 3, LayoutConfig::default()),
        ("company.json", 9, LayoutConfig::default()),
        ("orphans.json", 2, exclude),
    ];
    for (fixture, expected, config) in cases {
        let request = load_request(fixture);
        let layout = layout_of(&request, &config);
        assert_tree_invariants(&layout, expected, fixture);
    }
}

#[test]
fn company_roots_and_siblings_keep_their_order() {
    let request = load_request("company.json");
    let layout = layout_of(&request, &LayoutConfig::default());

    let roots: Vec<u64> = layout.roots().map(|node| node.objective.id.0).collect();
    assert_eq!(roots, vec![10, 30]);

    let order: Vec<u64> = layout.nodes.iter().map(|node| node.objective.id.0).collect();
    assert_eq!(order, vec![10, 11, 13, 14, 12, 15, 30, 31, 32]);

    let x = |id: u64| layout.node_for_objective(RecordId(id)).unwrap().x;
    assert_eq!(x(10), 300.0);
    assert_eq!(x(11), 175.0);
    assert_eq!(x(13), 50.0);
    assert_eq!(x(14), 300.0);
    assert_eq!(x(12), 550.0);
    assert_eq!(x(30), 925.0);
    assert_eq!(x(32), 1050.0);
}

#[test]
fn subtree_spans_never_overlap() {
    let request = load_request("company.json");
    let layout = layout_of(&request, &LayoutConfig::default());
    let mut by_depth: HashMap<usize, Vec<(f32, f32)>> = HashMap::new();
    for node in &layout.nodes {
        by_depth
            .entry(node.depth)
            .or_default()
            .push((node.x, node.x + node.width));
    }
    for spans in by_depth.values_mut() {
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlap between {pair:?}");
        }
    }
}

#[test]
fn expansion_pushes_later_deeper_nodes_only() {
    let request = load_request("company.json");
    let config = LayoutConfig::default();
    let baseline = layout_of(&request, &config);

    let node = baseline.node_for_objective(RecordId(11)).unwrap().id;
    let expansion = ExpansionState::new().expanded(node, Some(380.0));
    let expanded = compute_layout(&request.objectives, &request.context, &expansion, &config)
        .expect("layout failed");

    let y = |layout: &TreeLayout<'_>, id: u64| layout.node_for_objective(RecordId(id)).unwrap().y;
    // Same depth as the expanded node or shallower, including later roots' children.
    for id in [10, 11, 12, 30, 31, 32] {
        assert_eq!(y(&expanded, id), y(&baseline, id), "objective {id} moved");
    }
    for id in [13, 14, 15] {
        assert_eq!(y(&expanded, id) - y(&baseline, id), 420.0, "objective {id}");
    }
    for (before, after) in baseline.nodes.iter().zip(&expanded.nodes) {
        assert_eq!(before.x, after.x);
    }
}

fn node<'l, 'a>(layout: &'l TreeLayout<'a>, id: u64) -> &'l PositionedNode<'a> {
    layout
        .node_for_objective(RecordId(id))
        .unwrap_or_else(|| panic!("objective {id} not laid out"))
}

#[test]
fn company_flags_follow_viewer_team_and_filters() {
    let request = load_request("company.json");
    let layout = layout_of(&request, &LayoutConfig::default());

    assert!(node(&layout, 10).assigned_to_viewer);
    assert!(!node(&layout, 11).assigned_to_viewer);
    assert!(node(&layout, 13).assigned_to_team);
    assert_eq!(node(&layout, 11).assignees, vec!["Morgan".to_string()]);
    assert_eq!(
        node(&layout, 13).assignees,
        vec!["Avery".to_string(), "Jordan".to_string()]
    );
    assert!(layout.nodes.iter().all(|node| node.matches_filter));

    let mut filtered_request = load_request("company.json");
    filtered_request.context.filters = Filters {
        business_unit: Some(RecordId(1)),
        assigned_to: None,
    };
    let filtered = layout_of(&filtered_request, &LayoutConfig::default());
    let matching: Vec<u64> = filtered
        .nodes
        .iter()
        .filter(|node| node.matches_filter)
        .map(|node| node.objective.id.0)
        .collect();
    assert_eq!(matching, vec![10, 11]);
    assert_eq!(filtered.nodes.len(), layout.nodes.len());
}

#[test]
fn children_follow_input_order() {
    let request = load_request("company.json");
    let layout = layout_of(&request, &LayoutConfig::default());
    let children = |id: u64| -> Vec<u64> {
        layout
            .children_of(node(&layout, id).id)
            .map(|child| child.objective.id.0)
            .collect()
    };
    assert_eq!(children(10), vec![11, 12]);
    assert_eq!(children(11), vec![13, 14]);
    assert_eq!(children(30), vec![31, 32]);
    assert!(children(13).is_empty());
}

#[test]
fn orphan_policies_on_fixture() {
    let request = load_request("orphans.json");
    let context = LayoutContext::default();
    let expansion = ExpansionState::new();

    let rejected = compute_layout(
        &request.objectives,
        &context,
        &expansion,
        &LayoutConfig::default(),
    );
    assert!(matches!(
        rejected,
        Err(LayoutError::DanglingParentReference { .. })
    ));

    let promote = LayoutConfig {
        orphan_policy: OrphanPolicy::PromoteToRoot,
        ..LayoutConfig::default()
    };
    let promoted = compute_layout(&request.objectives, &context, &expansion, &promote).unwrap();
    assert_eq!(promoted.nodes.len(), 4);
    assert_eq!(promoted.edges.len(), 2);
    let roots: Vec<u64> = promoted.roots().map(|node| node.objective.id.0).collect();
    assert_eq!(roots, vec![1, 7]);
}

#[test]
fn cycles_fail_the_whole_pass() {
    let objectives = vec![
        Objective::new(1, "root"),
        Objective::new(2, "a").with_parent(4),
        Objective::new(3, "b").with_parent(2),
        Objective::new(4, "c").with_parent(3),
    ];
    for policy in [
        OrphanPolicy::Reject,
        OrphanPolicy::Exclude,
        OrphanPolicy::PromoteToRoot,
    ] {
        let config = LayoutConfig {
            orphan_policy: policy,
            ..LayoutConfig::default()
        };
        let result = compute_layout(
            &objectives,
            &LayoutContext::default(),
            &ExpansionState::new(),
            &config,
        );
        assert!(
            matches!(result, Err(LayoutError::CyclicReference { .. })),
            "{policy:?}"
        );
    }
}

#[test]
fn wide_flat_tree_lays_out_every_objective() {
    let mut objectives = vec![Objective::new(1, "root")];
    for id in 2..=300u64 {
        let parent = if id <= 20 { 1 } else { id % 19 + 2 };
        objectives.push(Objective::new(id, format!("objective {id}")).with_parent(parent));
    }
    let layout = compute_layout(
        &objectives,
        &LayoutContext::default(),
        &ExpansionState::new(),
        &LayoutConfig::default(),
    )
    .unwrap();
    assert_eq!(layout.nodes.len(), 300);
    assert_eq!(layout.edges.len(), 299);
}
