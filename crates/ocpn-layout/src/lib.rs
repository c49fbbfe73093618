//! Sugiyama-style layout for object-centric Petri nets.
//!
//! A [`Net`] of places, transitions and arcs goes through cycle breaking, layer assignment,
//! dummy insertion, crossing reduction, coordinate assignment and arc routing. The result is a
//! [`Layout`] with a position and size for every node and a polyline for every arc.

pub mod acyclic;
pub mod config;
pub mod coordinate_system;
pub mod error;
pub mod graph_view;
pub mod ids;
pub mod layout;
pub mod model;
pub mod net;
pub mod normalize;
pub mod order;
pub mod pipeline;
pub mod position;
pub mod rank;
pub mod route;

pub use config::{Alignment, Config, Direction, Ranker};
pub use error::{Error, Result, ValidationError};
pub use layout::{Layout, LayoutStage, LayoutStats};
pub use model::{Arc, Bounds, Node, NodeKind, Point, Size};
pub use net::{Net, NetArc, NetNode, Place, Transition};
pub use pipeline::Pipeline;
pub use rank::{IlpSolver, LayerProblem, LayerSolver, LongestPathSolver};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `net` with the solver selected by `config.ranker`.
pub fn layout(net: &Net, config: &Config) -> Result<Layout> {
    Pipeline::new(config.clone())?.run(net)
}
