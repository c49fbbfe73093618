//! Coordinate assignment.
//!
//! Nodes get their configured sizes, the in-layer axis comes from Brandes & Köpf and the layer
//! axis from stacking layer bands. Everything is computed top-to-bottom and converted at the
//! end; the drawing is translated so that its bounding box starts at the border padding.

pub mod bk;
pub mod conflicts;

use crate::config::Config;
use crate::coordinate_system;
use crate::error::{Error, Result};
use crate::layout::{Layout, LayoutStage};
use crate::model::NodeId;
use rustc_hash::FxHashMap as HashMap;

pub fn run(layout: &mut Layout, config: &Config) -> Result<()> {
    layout.ensure_stage(LayoutStage::Ordered)?;

    for node in layout.nodes.values_mut() {
        let size = config.node_size(&node.kind);
        node.width = size.width;
        node.height = size.height;
    }
    coordinate_system::adjust(layout, config.direction);

    layout.stats.type1_conflicts = conflicts::mark_type1_conflicts(layout);
    let conflicts = conflicts::Conflicts::flagged(layout);
    let adjacency = layout.adjacency();
    let xs = {
        let extents: HashMap<&str, f64> = layout
            .nodes
            .values()
            .map(|n| (n.id.as_str(), n.width))
            .collect();
        bk::position_x(
            &layout.layering,
            &adjacency,
            &conflicts,
            |v| extents.get(v).copied().unwrap_or(0.0),
            config.vertex_sep,
            config.single_direction,
        )
    };
    let ys = layer_axis(layout, config.layer_sep)?;

    let ids: Vec<NodeId> = layout.layering.iter().flatten().cloned().collect();
    for id in ids {
        let (Some(&x), Some(&y)) = (xs.get(&id), ys.get(&id)) else {
            return Err(Error::invariant(format!("node {id} was not positioned")));
        };
        let node = layout.require_node_mut(&id)?;
        node.x = Some(x);
        node.y = Some(y);
    }

    coordinate_system::undo(layout, config.direction);
    translate(layout, config.border_padding);

    tracing::debug!(
        type1_conflicts = layout.stats.type1_conflicts,
        single_direction = ?config.single_direction,
        "coordinate assignment finished"
    );
    layout.advance(LayoutStage::Ordered)
}

/// Layer-axis coordinate of every node: layer bands of the tallest node's height, `layer_sep`
/// apart. Dummies next to a real node sit on the near edge of their band.
fn layer_axis(layout: &Layout, layer_sep: f64) -> Result<HashMap<NodeId, f64>> {
    let mut ys: HashMap<NodeId, f64> = HashMap::default();
    let mut cursor: f64 = 0.0;
    for layer in &layout.layering {
        let mut thickness: f64 = 0.0;
        for id in layer {
            thickness = thickness.max(layout.require_node(id)?.height);
        }
        let center = cursor + thickness / 2.0;
        for id in layer {
            let node = layout.require_node(id)?;
            let y = match node.dummy() {
                Some(d) => {
                    let upper_real = layout.node(&d.upper).is_some_and(|n| !n.is_dummy());
                    let lower_real = layout.node(&d.lower).is_some_and(|n| !n.is_dummy());
                    match (upper_real, lower_real) {
                        (true, false) => center - thickness / 2.0,
                        (false, true) => center + thickness / 2.0,
                        _ => center,
                    }
                }
                None => center,
            };
            ys.insert(id.clone(), y);
        }
        cursor += thickness + layer_sep;
    }
    Ok(ys)
}

fn translate(layout: &mut Layout, padding: f64) {
    let Some(bounds) = layout.bounds() else {
        return;
    };
    let dx = padding - bounds.min_x;
    let dy = padding - bounds.min_y;
    for node in layout.nodes.values_mut() {
        if let (Some(x), Some(y)) = (node.x, node.y) {
            node.x = Some(x + dx);
            node.y = Some(y + dy);
        }
    }
}
