use crate::ir::{Objective, RecordId};
use crate::layout::TreeLayout;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Graph-view document: string ids, `position`, and per-node `data`.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump<'a>>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump<'a> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub position: PositionDump,
    pub width: f32,
    pub height: f32,
    pub data: NodeDataDump<'a>,
}

#[derive(Debug, Serialize)]
pub struct PositionDump {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataDump<'a> {
    pub objective_id: RecordId,
    pub level: usize,
    pub expanded: bool,
    pub is_leaf: bool,
    pub matches_filter: bool,
    pub is_assigned_to_me: bool,
    pub is_assigned_to_team: bool,
    pub assignees: &'a [String],
    pub okr: &'a Objective,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a TreeLayout<'a>) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.to_string(),
                kind: "okr",
                position: PositionDump {
                    x: node.x,
                    y: node.y,
                },
                width: node.width,
                height: node.height,
                data: NodeDataDump {
                    objective_id: node.objective.id,
                    level: node.depth,
                    expanded: node.expanded,
                    is_leaf: node.is_leaf,
                    matches_filter: node.matches_filter,
                    is_assigned_to_me: node.assigned_to_viewer,
                    is_assigned_to_team: node.assigned_to_team,
                    assignees: &node.assignees,
                    okr: node.objective,
                },
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id(),
                source: edge.source.to_string(),
                target: edge.target.to_string(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump_to<W: Write>(writer: W, layout: &TreeLayout<'_>) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

pub fn write_layout_dump(path: &Path, layout: &TreeLayout<'_>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_layout_dump_to(&mut writer, layout)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::LayoutContext;
    use crate::layout::{ExpansionState, compute_layout};

    #[test]
    fn dump_uses_string_ids_and_edge_convention() {
        let objectives = vec![
            Objective::new(1, "root"),
            Objective::new(2, "child").with_parent(1),
        ];
        let layout = compute_layout(
            &objectives,
            &LayoutContext::default(),
            &ExpansionState::new(),
            &LayoutConfig::default(),
        )
        .unwrap();
        let mut out = Vec::new();
        write_layout_dump_to(&mut out, &layout).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["nodes"][1]["id"], "2");
        assert_eq!(value["nodes"][1]["data"]["okr"]["name"], "child");
        assert_eq!(value["nodes"][0]["data"]["isLeaf"], false);
        assert_eq!(value["edges"][0]["id"], "e1-2");
        assert_eq!(value["edges"][0]["source"], "1");
    }
}
