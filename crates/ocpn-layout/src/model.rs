//! Node, arc and geometry types shared by every pipeline stage.

use serde::Serialize;
use std::collections::BTreeSet;

pub type NodeId = String;
pub type ArcId = String;

/// Ordered layers of node ids; the order inside a layer is the left-to-right order.
pub type Layering = Vec<Vec<NodeId>>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub(crate) fn include(&mut self, center: Point, size: Size) {
        self.min_x = self.min_x.min(center.x - size.width / 2.0);
        self.max_x = self.max_x.max(center.x + size.width / 2.0);
        self.min_y = self.min_y.min(center.y - size.height / 2.0);
        self.max_y = self.max_y.max(center.y + size.height / 2.0);
    }

    pub(crate) fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceData {
    pub object_type: String,
    pub source: bool,
    pub sink: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionData {
    pub label: String,
    pub silent: bool,
    pub adjacent_object_types: BTreeSet<String>,
}

/// Link of a dummy chain: `upper` sits one layer above, `lower` one layer below.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DummyData {
    pub arc: ArcId,
    pub upper: NodeId,
    pub lower: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Place(PlaceData),
    Transition(TransitionData),
    Dummy(DummyData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub layer: Option<usize>,
    pub pos: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            layer: None,
            pos: None,
            x: None,
            y: None,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, NodeKind::Dummy(_))
    }

    pub fn object_type(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Place(p) => Some(&p.object_type),
            _ => None,
        }
    }

    pub fn dummy(&self) -> Option<&DummyData> {
        match &self.kind {
            NodeKind::Dummy(d) => Some(d),
            _ => None,
        }
    }

    pub fn center(&self) -> Option<Point> {
        Some(Point {
            x: self.x?,
            y: self.y?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub id: ArcId,
    pub source: NodeId,
    pub target: NodeId,
    pub reversed: bool,
    pub weight: u32,
    pub variable: bool,
    /// Dummy chain in upper-to-lower order; empty while the arc spans one layer.
    pub path: Vec<NodeId>,
    pub min_layer: Option<usize>,
    pub max_layer: Option<usize>,
    /// `false` for the boundary arcs synthesized around dummy chains.
    pub original: bool,
    pub type1: bool,
    pub object_type: Option<String>,
    pub points: Vec<Point>,
}

impl Arc {
    pub fn new(id: impl Into<ArcId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            reversed: false,
            weight: 1,
            variable: false,
            path: Vec::new(),
            min_layer: None,
            max_layer: None,
            original: true,
            type1: false,
            object_type: None,
            points: Vec::new(),
        }
    }

    /// Endpoint that must sit on the lower layer index.
    pub fn upper(&self) -> &str {
        if self.reversed {
            &self.target
        } else {
            &self.source
        }
    }

    /// Endpoint that must sit on the higher layer index.
    pub fn lower(&self) -> &str {
        if self.reversed {
            &self.source
        } else {
            &self.target
        }
    }
}

/// One single-layer segment of the proper layering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub upper: NodeId,
    pub lower: NodeId,
    pub arc: ArcId,
}
