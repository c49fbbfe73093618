//! Arc routing: drops the proper-layering scaffolding and turns dummy chains into waypoints.

use crate::error::{Error, Result};
use crate::layout::{Layout, LayoutStage};
use crate::model::Point;

pub fn run(layout: &mut Layout) -> Result<()> {
    layout.ensure_stage(LayoutStage::Positioned)?;

    layout.arcs.retain(|_, a| a.original);

    let mut routed: Vec<(String, Option<String>, Vec<Point>)> =
        Vec::with_capacity(layout.arcs.len());
    for arc in layout.arcs.values() {
        let object_type = [&arc.source, &arc.target]
            .into_iter()
            .find_map(|id| layout.node(id).and_then(|n| n.object_type()))
            .map(str::to_string);

        let mut chain: Vec<&String> = arc.path.iter().collect();
        if arc.reversed {
            chain.reverse();
        }
        let mut points: Vec<Point> = Vec::with_capacity(chain.len() + 2);
        for id in std::iter::once(&arc.source)
            .chain(chain)
            .chain(std::iter::once(&arc.target))
        {
            let center = layout
                .require_node(id)?
                .center()
                .ok_or_else(|| Error::invariant(format!("node {id} has no coordinates")))?;
            points.push(center);
        }
        routed.push((arc.id.clone(), object_type, points));
    }
    for (id, object_type, points) in routed {
        if let Some(arc) = layout.arcs.get_mut(&id) {
            arc.object_type = object_type;
            arc.points = points;
            arc.path.clear();
        }
    }

    layout.nodes.retain(|_, n| !n.is_dummy());
    let nodes = &layout.nodes;
    for layer in &mut layout.layering {
        layer.retain(|id| nodes.contains_key(id));
    }
    layout.assign_positions()?;

    tracing::debug!(arcs = layout.arcs.len(), "arc routing finished");
    layout.advance(LayoutStage::Positioned)
}
