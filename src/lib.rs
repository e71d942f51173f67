#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, OrphanPolicy, ViewportConfig, load_config, parse_config};
pub use ir::{
    BusinessUnitRef, Filters, LayoutContext, LayoutRequest, Objective, RecordId, User, UserRef,
};
pub use layout::{
    ExpansionState, LayoutError, NodeExpansion, NodeId, PositionedNode, TreeEdge, TreeLayout,
    compute_layout,
};
pub use layout_dump::{LayoutDump, write_layout_dump, write_layout_dump_to};
pub use session::{SessionEvent, TreeSession};
