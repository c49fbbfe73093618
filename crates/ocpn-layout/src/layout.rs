//! The `Layout` aggregate threaded through the pipeline.

use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::model::{
    Arc, Bounds, Hop, Layering, Node, NodeId, NodeKind, PlaceData, TransitionData,
};
use crate::net::{Net, NetNode};
use indexmap::IndexMap;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Pipeline progress. Stages only move forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStage {
    Raw,
    CyclesBroken,
    LayersAssigned,
    ProperlyLayered,
    Ordered,
    Positioned,
    Routed,
}

impl LayoutStage {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Raw => Some(Self::CyclesBroken),
            Self::CyclesBroken => Some(Self::LayersAssigned),
            Self::LayersAssigned => Some(Self::ProperlyLayered),
            Self::ProperlyLayered => Some(Self::Ordered),
            Self::Ordered => Some(Self::Positioned),
            Self::Positioned => Some(Self::Routed),
            Self::Routed => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub reversed_arcs: usize,
    pub dummy_vertices: usize,
    pub type1_conflicts: usize,
    pub crossings: usize,
    pub ordering_score: f64,
    pub ordering_sweeps: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub nodes: IndexMap<NodeId, Node>,
    pub arcs: IndexMap<String, Arc>,
    pub layering: Layering,
    pub stats: LayoutStats,
    stage: LayoutStage,
    #[serde(skip)]
    ids: IdGenerator,
}

impl Layout {
    pub fn from_net(net: &Net) -> Self {
        let mut nodes: IndexMap<NodeId, Node> = IndexMap::with_capacity(net.node_count());
        for node in net.nodes() {
            let kind = match node {
                NetNode::Place(p) => NodeKind::Place(PlaceData {
                    object_type: p.object_type.clone(),
                    source: p.initial,
                    sink: p.final_,
                }),
                NetNode::Transition(t) => NodeKind::Transition(TransitionData {
                    label: t.label.clone(),
                    silent: t.silent,
                    adjacent_object_types: BTreeSet::new(),
                }),
            };
            nodes.insert(node.id().to_string(), Node::new(node.id(), kind));
        }

        let mut arcs: IndexMap<String, Arc> = IndexMap::with_capacity(net.arc_count());
        for a in net.arcs() {
            let mut arc = Arc::new(a.id.clone(), a.source.clone(), a.target.clone());
            arc.weight = a.weight;
            arc.variable = a.variable;
            arcs.insert(a.id.clone(), arc);
        }

        let mut adjacent: HashMap<NodeId, BTreeSet<String>> = HashMap::default();
        for arc in arcs.values() {
            for (end, other) in [(&arc.source, &arc.target), (&arc.target, &arc.source)] {
                if let Some(object_type) = nodes.get(other).and_then(|n| n.object_type()) {
                    adjacent
                        .entry(end.clone())
                        .or_default()
                        .insert(object_type.to_string());
                }
            }
        }
        for node in nodes.values_mut() {
            if let NodeKind::Transition(t) = &mut node.kind {
                if let Some(types) = adjacent.remove(&node.id) {
                    t.adjacent_object_types = types;
                }
            }
        }

        Self {
            nodes,
            arcs,
            layering: Vec::new(),
            stats: LayoutStats::default(),
            stage: LayoutStage::Raw,
            ids: IdGenerator::new(),
        }
    }

    pub fn stage(&self) -> LayoutStage {
        self.stage
    }

    pub(crate) fn ensure_stage(&self, expected: LayoutStage) -> Result<()> {
        if self.stage != expected {
            return Err(Error::invariant(format!(
                "stage requires a layout in state {expected:?}, found {:?}",
                self.stage
            )));
        }
        Ok(())
    }

    pub(crate) fn advance(&mut self, from: LayoutStage) -> Result<()> {
        self.ensure_stage(from)?;
        self.stage = from
            .next()
            .ok_or_else(|| Error::invariant("routed layouts are final"))?;
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn require_node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::invariant(format!("node {id} is missing from the layout")))
    }

    pub(crate) fn require_node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::invariant(format!("node {id} is missing from the layout")))
    }

    pub(crate) fn require_layer(&self, id: &str) -> Result<usize> {
        self.require_node(id)?
            .layer
            .ok_or_else(|| Error::invariant(format!("node {id} has no layer")))
    }

    pub fn arc(&self, id: &str) -> Option<&Arc> {
        self.arcs.get(id)
    }

    pub(crate) fn fresh_node_id(&mut self, prefix: &str) -> NodeId {
        let nodes = &self.nodes;
        self.ids.next_free(prefix, |id| nodes.contains_key(id))
    }

    pub(crate) fn fresh_arc_id(&mut self, prefix: &str) -> String {
        let arcs = &self.arcs;
        self.ids.next_free(prefix, |id| arcs.contains_key(id))
    }

    /// Single-layer segments: unsplit arcs (boundary arcs included) and dummy-to-dummy links.
    pub fn hops(&self) -> Vec<Hop> {
        let mut hops: Vec<Hop> = Vec::with_capacity(self.arcs.len());
        for arc in self.arcs.values() {
            if arc.path.is_empty() {
                hops.push(Hop {
                    upper: arc.upper().to_string(),
                    lower: arc.lower().to_string(),
                    arc: arc.id.clone(),
                });
            }
        }
        for node in self.nodes.values() {
            let Some(d) = node.dummy() else {
                continue;
            };
            if self.nodes.get(&d.lower).is_some_and(Node::is_dummy) {
                hops.push(Hop {
                    upper: node.id.clone(),
                    lower: d.lower.clone(),
                    arc: d.arc.clone(),
                });
            }
        }
        hops
    }

    pub fn adjacency(&self) -> Adjacency {
        Adjacency::from_hops(&self.hops())
    }

    /// Bounding box of all positioned nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::empty();
        for node in self.nodes.values() {
            if let Some(center) = node.center() {
                bounds.include(center, size_of(node));
            }
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Bounding box of each layer of the current layering.
    pub fn layer_bounds(&self) -> Vec<Option<Bounds>> {
        self.layering
            .iter()
            .map(|layer| {
                let mut bounds = Bounds::empty();
                for id in layer {
                    if let Some(node) = self.nodes.get(id) {
                        if let Some(center) = node.center() {
                            bounds.include(center, size_of(node));
                        }
                    }
                }
                (!bounds.is_empty()).then_some(bounds)
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes each node's index within its layer.
    pub(crate) fn assign_positions(&mut self) -> Result<()> {
        let layering = std::mem::take(&mut self.layering);
        for layer in &layering {
            for (i, id) in layer.iter().enumerate() {
                self.require_node_mut(id)?.pos = Some(i);
            }
        }
        self.layering = layering;
        Ok(())
    }
}

fn size_of(node: &Node) -> crate::model::Size {
    crate::model::Size {
        width: node.width,
        height: node.height,
    }
}

/// Upper and lower neighbors of every node over the hops of a proper layering.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    uppers: HashMap<NodeId, Vec<NodeId>>,
    lowers: HashMap<NodeId, Vec<NodeId>>,
}

impl Adjacency {
    pub fn from_hops(hops: &[Hop]) -> Self {
        let mut adjacency = Self::default();
        for hop in hops {
            adjacency
                .lowers
                .entry(hop.upper.clone())
                .or_default()
                .push(hop.lower.clone());
            adjacency
                .uppers
                .entry(hop.lower.clone())
                .or_default()
                .push(hop.upper.clone());
        }
        adjacency
    }

    pub fn uppers(&self, v: &str) -> &[NodeId] {
        self.uppers.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lowers(&self, v: &str) -> &[NodeId] {
        self.lowers.get(v).map(Vec::as_slice).unwrap_or(&[])
    }
}
