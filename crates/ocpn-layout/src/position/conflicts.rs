//! Type-1 conflicts: a non-inner hop crossing an inner segment (a dummy-to-dummy hop).

use crate::layout::Layout;
use crate::model::{Hop, Layering, NodeId};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeSet;

/// Hops excluded from vertical alignment, stored without direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conflicts {
    hops: BTreeSet<(NodeId, NodeId)>,
}

impl Conflicts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conflicts of every hop whose arc is already flagged `type1`.
    pub fn flagged(layout: &Layout) -> Self {
        let mut conflicts = Self::new();
        for hop in layout.hops() {
            if layout.arc(&hop.arc).is_some_and(|a| a.type1) {
                conflicts.insert(&hop.upper, &hop.lower);
            }
        }
        conflicts
    }

    pub fn insert(&mut self, v: &str, w: &str) -> bool {
        self.hops.insert(key(v, w))
    }

    pub fn contains(&self, v: &str, w: &str) -> bool {
        self.hops.contains(&key(v, w))
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

fn key(v: &str, w: &str) -> (NodeId, NodeId) {
    if v <= w {
        (v.to_string(), w.to_string())
    } else {
        (w.to_string(), v.to_string())
    }
}

/// Non-inner hops that cross an inner segment.
///
/// Only hops ending in layers `2..len - 1` are considered, so the first and the last pair of
/// layers never produce conflicts.
pub fn find_type1_conflicts(
    layering: &Layering,
    hops: &[Hop],
    is_dummy: impl Fn(&str) -> bool,
) -> Conflicts {
    let mut conflicts = Conflicts::new();
    if layering.len() < 4 {
        return conflicts;
    }

    let mut slot: HashMap<&str, (usize, usize)> = HashMap::default();
    for (l, layer) in layering.iter().enumerate() {
        for (p, v) in layer.iter().enumerate() {
            slot.insert(v.as_str(), (l, p));
        }
    }

    // Per lower layer: (upper pos, lower pos, hop, inner).
    let mut by_layer: Vec<Vec<(usize, usize, &Hop, bool)>> = vec![Vec::new(); layering.len()];
    for hop in hops {
        let (Some(&(lu, pu)), Some(&(ll, pl))) =
            (slot.get(hop.upper.as_str()), slot.get(hop.lower.as_str()))
        else {
            continue;
        };
        if ll != lu + 1 || !(2..layering.len() - 1).contains(&ll) {
            continue;
        }
        let inner = is_dummy(hop.upper.as_str()) && is_dummy(hop.lower.as_str());
        by_layer[ll].push((pu, pl, hop, inner));
    }

    for segments in &by_layer {
        let inner: Vec<(usize, usize)> = segments
            .iter()
            .filter(|s| s.3)
            .map(|&(pu, pl, _, _)| (pu, pl))
            .collect();
        if inner.is_empty() {
            continue;
        }
        for &(pu, pl, hop, is_inner) in segments {
            let crosses = inner
                .iter()
                .any(|&(iu, il)| (pu < iu && pl > il) || (pu > iu && pl < il));
            if !is_inner && crosses {
                conflicts.insert(&hop.upper, &hop.lower);
            }
        }
    }
    conflicts
}

/// Flags the arc of every conflicting hop and returns the number of flagged hops.
pub fn mark_type1_conflicts(layout: &mut Layout) -> usize {
    let hops = layout.hops();
    let conflicts = find_type1_conflicts(&layout.layering, &hops, |v| {
        layout.node(v).is_some_and(|n| n.is_dummy())
    });

    let mut marked = 0usize;
    for hop in &hops {
        if !conflicts.contains(&hop.upper, &hop.lower) {
            continue;
        }
        if let Some(arc) = layout.arcs.get_mut(&hop.arc) {
            arc.type1 = true;
            marked += 1;
        }
    }
    marked
}
