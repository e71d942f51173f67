use crate::config::{OrphanPolicy, load_config};
use crate::ir::{LayoutRequest, Objective, RecordId};
use crate::layout::{ExpansionState, NodeId, compute_layout};
use crate::layout_dump::{write_layout_dump, write_layout_dump_to};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "okrtree", version, about = "Lay out an OKR objective tree for a graph view")]
pub struct Args {
    /// Input file (layout request or bare objective array) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5 overrides of the layout constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width; overrides the request context
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// What to do with objectives whose parent does not exist
    #[arg(long = "orphans", value_enum)]
    pub orphans: Option<OrphanPolicy>,

    /// Business unit filter
    #[arg(long = "business-unit")]
    pub business_unit: Option<u64>,

    /// Assigned-user filter
    #[arg(long = "assigned-to")]
    pub assigned_to: Option<u64>,

    /// Expand a node: NODE or NODE:HEIGHT (repeatable)
    #[arg(long = "expand", value_parser = parse_expand)]
    pub expand: Vec<ExpandArg>,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandArg {
    pub node: NodeId,
    pub height: Option<f32>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    if let Some(policy) = args.orphans {
        config.orphan_policy = policy;
    }

    let input = read_input(args.input.as_deref())?;
    let mut request = parse_request(&input)?;
    apply_overrides(&mut request, &args);

    let layout = compute_layout(
        &request.objectives,
        &request.context,
        &request.expansion,
        &config,
    )?;
    info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        width = layout.width,
        height = layout.height,
        "layout ready"
    );

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout)?,
        None => {
            let stdout = io::stdout();
            write_layout_dump_to(stdout.lock(), &layout)?;
            println!();
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("okr_tree_layout={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Accepts a full request document or a bare array of objectives.
fn parse_request(input: &str) -> Result<LayoutRequest> {
    let value: serde_json::Value = serde_json::from_str(input).context("input is not valid JSON")?;
    if value.is_array() {
        let objectives: Vec<Objective> = serde_json::from_value(value)?;
        return Ok(LayoutRequest {
            objectives,
            ..LayoutRequest::default()
        });
    }
    Ok(serde_json::from_value(value)?)
}

fn apply_overrides(request: &mut LayoutRequest, args: &Args) {
    if let Some(width) = args.width {
        request.context.viewport_width = width;
    }
    if let Some(unit) = args.business_unit {
        request.context.filters.business_unit = Some(RecordId(unit));
    }
    if let Some(user) = args.assigned_to {
        request.context.filters.assigned_to = Some(RecordId(user));
    }
    if !args.expand.is_empty() {
        let mut expansion: ExpansionState = request.expansion.clone();
        for arg in &args.expand {
            expansion = expansion.expanded(arg.node, arg.height);
        }
        request.expansion = expansion;
    }
}

fn parse_expand(value: &str) -> Result<ExpandArg, String> {
    let (node, height) = match value.split_once(':') {
        Some((node, height)) => (node, Some(height)),
        None => (value, None),
    };
    let node = node
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid node id {node:?}"))?;
    let height = match height {
        Some(raw) => Some(
            raw.trim()
                .parse::<f32>()
                .map_err(|_| format!("invalid height {raw:?}"))?,
        ),
        None => None,
    };
    Ok(ExpandArg {
        node: NodeId(node),
        height,
    })
}
