//! Proper layering: long arcs are split into chains of dummy vertices.
//!
//! A split arc keeps its identity and records its chain in `path`. Two synthetic boundary arcs
//! connect the real endpoints to the ends of the chain; they are dropped again when arcs are
//! routed.

use crate::error::{Error, Result};
use crate::layout::{Layout, LayoutStage};
use crate::model::{Arc, DummyData, Node, NodeId, NodeKind};

pub(crate) const DUMMY_PREFIX: &str = "_d";
pub(crate) const BOUNDARY_PREFIX: &str = "_b";

pub fn run(layout: &mut Layout) -> Result<()> {
    layout.ensure_stage(LayoutStage::LayersAssigned)?;

    let arc_ids: Vec<String> = layout
        .arcs
        .values()
        .filter(|a| a.original)
        .map(|a| a.id.clone())
        .collect();
    let mut dummies = 0usize;
    for arc_id in arc_ids {
        dummies += normalize_arc(layout, &arc_id)?;
    }
    layout.stats.dummy_vertices = dummies;
    tracing::debug!(dummies, "dummy insertion finished");

    layout.advance(LayoutStage::LayersAssigned)
}

fn normalize_arc(layout: &mut Layout, arc_id: &str) -> Result<usize> {
    let Some(arc) = layout.arcs.get(arc_id) else {
        return Err(Error::invariant(format!("arc {arc_id} disappeared")));
    };
    let upper = arc.upper().to_string();
    let lower = arc.lower().to_string();
    let weight = arc.weight;
    let upper_layer = layout.require_layer(&upper)?;
    let lower_layer = layout.require_layer(&lower)?;

    if lower_layer <= upper_layer {
        return Err(Error::invariant(format!(
            "arc {arc_id} has slack {} between {upper} and {lower}",
            lower_layer as i64 - upper_layer as i64
        )));
    }
    if lower_layer == upper_layer + 1 {
        return Ok(0);
    }

    let chain: Vec<NodeId> = (upper_layer + 1..lower_layer)
        .map(|_| layout.fresh_node_id(DUMMY_PREFIX))
        .collect();
    for (i, id) in chain.iter().enumerate() {
        let layer = upper_layer + 1 + i;
        let data = DummyData {
            arc: arc_id.to_string(),
            upper: if i == 0 { upper.clone() } else { chain[i - 1].clone() },
            lower: chain.get(i + 1).cloned().unwrap_or_else(|| lower.clone()),
        };
        let mut node = Node::new(id.clone(), NodeKind::Dummy(data));
        node.layer = Some(layer);
        layout.nodes.insert(id.clone(), node);
        layout
            .layering
            .get_mut(layer)
            .ok_or_else(|| Error::invariant(format!("layer {layer} does not exist")))?
            .push(id.clone());
    }

    let (Some(first), Some(last)) = (chain.first().cloned(), chain.last().cloned()) else {
        return Ok(0);
    };
    for (from, to, min_layer, max_layer) in [
        (upper, first, upper_layer, upper_layer + 1),
        (last, lower, lower_layer - 1, lower_layer),
    ] {
        let id = layout.fresh_arc_id(BOUNDARY_PREFIX);
        let mut boundary = Arc::new(id.clone(), from, to);
        boundary.weight = weight;
        boundary.original = false;
        boundary.min_layer = Some(min_layer);
        boundary.max_layer = Some(max_layer);
        layout.arcs.insert(id, boundary);
    }

    let count = chain.len();
    if let Some(arc) = layout.arcs.get_mut(arc_id) {
        arc.path = chain;
    }
    Ok(count)
}
