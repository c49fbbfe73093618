//! Layer assignment.
//!
//! The layering problem is handed to an injected [`LayerSolver`]. Whatever the solver returns is
//! checked against the arc constraints before it touches the layout; each weakly connected
//! component is then shifted so that its topmost layer is 0.

mod ilp;
mod longest_path;

pub use ilp::IlpSolver;
pub use longest_path::LongestPathSolver;

use crate::error::{Error, Result};
use crate::layout::{Layout, LayoutStage};
use crate::model::Layering;

/// Nodes are indexed `0..node_count`; each arc is an `(upper, lower)` pair requiring
/// `layer[lower] - layer[upper] >= 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerProblem {
    pub node_count: usize,
    pub arcs: Vec<(usize, usize)>,
}

impl LayerProblem {
    pub fn new(node_count: usize, arcs: Vec<(usize, usize)>) -> Self {
        Self { node_count, arcs }
    }

    /// Indexes nodes by their position in `layout.nodes`; arcs keep layout order.
    pub fn from_layout(layout: &Layout) -> Result<Self> {
        let mut arcs: Vec<(usize, usize)> = Vec::with_capacity(layout.arcs.len());
        for arc in layout.arcs.values() {
            let upper = index_of(layout, arc.upper())?;
            let lower = index_of(layout, arc.lower())?;
            arcs.push((upper, lower));
        }
        Ok(Self::new(layout.nodes.len(), arcs))
    }

    /// Describes the first constraint `layers` violates, if any.
    pub fn violation(&self, layers: &[usize]) -> Option<String> {
        if layers.len() != self.node_count {
            return Some(format!(
                "expected {} layers, got {}",
                self.node_count,
                layers.len()
            ));
        }
        self.arcs.iter().find_map(|&(upper, lower)| {
            let (lu, ll) = (layers.get(upper)?, layers.get(lower)?);
            (ll <= lu).then(|| {
                format!("arc {upper} -> {lower} spans layers {lu} -> {ll}")
            })
        })
    }

    /// Sum of arc spans; the quantity the integer program minimizes.
    pub fn total_span(&self, layers: &[usize]) -> usize {
        self.arcs
            .iter()
            .map(|&(upper, lower)| {
                let lu = layers.get(upper).copied().unwrap_or(0);
                let ll = layers.get(lower).copied().unwrap_or(0);
                ll.saturating_sub(lu)
            })
            .sum()
    }
}

/// Strategy computing a layer per node for a [`LayerProblem`].
pub trait LayerSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, problem: &LayerProblem) -> Result<Vec<usize>>;
}

pub fn run(layout: &mut Layout, solver: &dyn LayerSolver) -> Result<()> {
    layout.ensure_stage(LayoutStage::CyclesBroken)?;

    let problem = LayerProblem::from_layout(layout)?;
    tracing::debug!(
        solver = solver.name(),
        nodes = problem.node_count,
        arcs = problem.arcs.len(),
        "assigning layers"
    );

    let mut layers = solver.solve(&problem)?;
    if let Some(message) = problem.violation(&layers) {
        tracing::warn!(solver = solver.name(), %message, "rejecting layer assignment");
        return Err(Error::SolverInfeasible {
            solver: solver.name().to_string(),
            message,
        });
    }
    shift_components(&problem, &mut layers);

    let height = layers.iter().max().map_or(0, |&m| m + 1);
    let mut layering: Layering = vec![Vec::new(); height];
    for ((id, node), &layer) in layout.nodes.iter_mut().zip(&layers) {
        node.layer = Some(layer);
        layering[layer].push(id.clone());
    }
    for (arc, &(upper, lower)) in layout.arcs.values_mut().zip(&problem.arcs) {
        arc.min_layer = Some(layers[upper]);
        arc.max_layer = Some(layers[lower]);
    }
    layout.layering = layering;

    tracing::debug!(
        layers = height,
        span = problem.total_span(&layers),
        "layer assignment finished"
    );
    layout.advance(LayoutStage::CyclesBroken)
}

fn index_of(layout: &Layout, id: &str) -> Result<usize> {
    layout
        .nodes
        .get_index_of(id)
        .ok_or_else(|| Error::invariant(format!("arc endpoint {id} is missing from the layout")))
}

/// Moves every weakly connected component up so that its smallest layer becomes 0.
fn shift_components(problem: &LayerProblem, layers: &mut [usize]) {
    let mut parent: Vec<usize> = (0..problem.node_count).collect();
    fn find(parent: &mut [usize], mut v: usize) -> usize {
        while parent[v] != v {
            parent[v] = parent[parent[v]];
            v = parent[v];
        }
        v
    }
    for &(u, v) in &problem.arcs {
        let (ru, rv) = (find(&mut parent, u), find(&mut parent, v));
        if ru != rv {
            parent[ru.max(rv)] = ru.min(rv);
        }
    }

    let mut min_layer: Vec<usize> = vec![usize::MAX; problem.node_count];
    for (v, &layer) in layers.iter().enumerate() {
        let root = find(&mut parent, v);
        min_layer[root] = min_layer[root].min(layer);
    }
    for (v, layer) in layers.iter_mut().enumerate() {
        *layer -= min_layer[find(&mut parent, v)];
    }
}
