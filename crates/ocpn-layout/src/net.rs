//! Input net model.
//!
//! A `Net` is the validated hand-off from whatever parsed the process model. Every insertion
//! goes through the same checks, so a `Net` value is always bipartite and closed (every arc
//! endpoint exists).

use crate::error::ValidationError;
use crate::ids::IdGenerator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub object_type: String,
    #[serde(default)]
    pub initial: bool,
    #[serde(default, rename = "final")]
    pub final_: bool,
}

impl Place {
    pub fn new(id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            initial: false,
            final_: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub silent: bool,
}

impl Transition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            silent: false,
        }
    }

    pub fn silent(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            silent: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetArc {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub variable: bool,
}

fn default_weight() -> u32 {
    1
}

impl NetArc {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight: 1,
            variable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetNode {
    Place(Place),
    Transition(Transition),
}

impl NetNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Place(p) => &p.id,
            Self::Transition(t) => &t.id,
        }
    }

    fn is_place(&self) -> bool {
        matches!(self, Self::Place(_))
    }
}

/// JSON shape accepted by [`Net::from_json`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct NetDocument {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    arcs: Vec<NetArc>,
}

#[derive(Debug, Clone, Default)]
pub struct Net {
    nodes: IndexMap<String, NetNode>,
    arcs: IndexMap<String, NetArc>,
    ids: IdGenerator,
}

impl Net {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `{ "places": [...], "transitions": [...], "arcs": [...] }`.
    ///
    /// Places are inserted before transitions, then arcs, each in document order.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let doc: NetDocument = serde_json::from_str(text)?;
        let mut net = Self::new();
        for place in doc.places {
            net.add_place(place)?;
        }
        for transition in doc.transitions {
            net.add_transition(transition)?;
        }
        for arc in doc.arcs {
            net.add_arc(arc)?;
        }
        Ok(net)
    }

    pub fn add_place(&mut self, place: Place) -> Result<(), ValidationError> {
        self.ensure_unused(&place.id)?;
        self.nodes.insert(place.id.clone(), NetNode::Place(place));
        Ok(())
    }

    pub fn add_transition(&mut self, transition: Transition) -> Result<(), ValidationError> {
        self.ensure_unused(&transition.id)?;
        self.nodes
            .insert(transition.id.clone(), NetNode::Transition(transition));
        Ok(())
    }

    pub fn add_arc(&mut self, arc: NetArc) -> Result<(), ValidationError> {
        if self.arcs.contains_key(&arc.id) {
            return Err(ValidationError::DuplicateId { id: arc.id });
        }
        let source = self.endpoint(&arc, &arc.source)?;
        let target = self.endpoint(&arc, &arc.target)?;
        if source.is_place() == target.is_place() {
            return Err(ValidationError::NonBipartiteArc {
                arc_id: arc.id,
                source_id: arc.source,
                target_id: arc.target,
            });
        }
        self.arcs.insert(arc.id.clone(), arc);
        Ok(())
    }

    /// Adds a place with a generated `p<n>` id and returns the id.
    pub fn new_place(&mut self, object_type: impl Into<String>) -> String {
        let id = self.fresh_node_id("p");
        self.nodes
            .insert(id.clone(), NetNode::Place(Place::new(id.clone(), object_type)));
        id
    }

    /// Adds a transition with a generated `t<n>` id and returns the id.
    pub fn new_transition(&mut self, label: impl Into<String>) -> String {
        let id = self.fresh_node_id("t");
        self.nodes.insert(
            id.clone(),
            NetNode::Transition(Transition::new(id.clone(), label)),
        );
        id
    }

    /// Adds an arc with a generated `a<n>` id and returns the id.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, ValidationError> {
        let arcs = &self.arcs;
        let id = self.ids.next_free("a", |id| arcs.contains_key(id));
        self.add_arc(NetArc::new(id.clone(), source, target))?;
        Ok(id)
    }

    pub fn node(&self, id: &str) -> Option<&NetNode> {
        self.nodes.get(id)
    }

    /// Mutable access for flags and labels. The id must not be changed.
    pub fn place_mut(&mut self, id: &str) -> Option<&mut Place> {
        match self.nodes.get_mut(id) {
            Some(NetNode::Place(p)) => Some(p),
            _ => None,
        }
    }

    pub fn transition_mut(&mut self, id: &str) -> Option<&mut Transition> {
        match self.nodes.get_mut(id) {
            Some(NetNode::Transition(t)) => Some(t),
            _ => None,
        }
    }

    pub fn arc_mut(&mut self, id: &str) -> Option<&mut NetArc> {
        self.arcs.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NetNode> {
        self.nodes.values()
    }

    /// Arcs in insertion order.
    pub fn arcs(&self) -> impl Iterator<Item = &NetArc> {
        self.arcs.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    fn fresh_node_id(&mut self, prefix: &str) -> String {
        let nodes = &self.nodes;
        self.ids.next_free(prefix, |id| nodes.contains_key(id))
    }

    fn ensure_unused(&self, id: &str) -> Result<(), ValidationError> {
        if self.nodes.contains_key(id) {
            return Err(ValidationError::DuplicateId { id: id.to_string() });
        }
        Ok(())
    }

    fn endpoint(&self, arc: &NetArc, node_id: &str) -> Result<&NetNode, ValidationError> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| ValidationError::UnknownEndpoint {
                arc_id: arc.id.clone(),
                node_id: node_id.to_string(),
            })
    }
}
