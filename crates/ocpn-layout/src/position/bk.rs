//! Brandes & Köpf coordinate assignment along the in-layer axis.
//!
//! Each of the four alignments builds blocks of vertically aligned nodes, compacts them over a
//! block graph and yields one coordinate per node. The four results are aligned to the
//! narrowest one and combined by their median.

use super::conflicts::Conflicts;
use crate::config::Alignment;
use crate::layout::Adjacency;
use crate::model::{Layering, NodeId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

pub type Xs = HashMap<NodeId, f64>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockAlignment {
    pub root: HashMap<NodeId, NodeId>,
    pub align: HashMap<NodeId, NodeId>,
}

/// Aligns every node with its median neighbor(s) from `neighbors`, left median first.
///
/// A candidate is skipped when the hop is a conflict or when it would cross an alignment
/// already made in the same layer.
pub fn vertical_alignment<F>(
    layering: &Layering,
    conflicts: &Conflicts,
    neighbors: F,
) -> BlockAlignment
where
    F: Fn(&str) -> Vec<NodeId>,
{
    let pos: HashMap<&str, usize> = layering
        .iter()
        .flat_map(|layer| layer.iter().enumerate().map(|(i, v)| (v.as_str(), i)))
        .collect();
    let mut blocks = BlockAlignment::default();
    for v in layering.iter().flatten() {
        blocks.root.insert(v.clone(), v.clone());
        blocks.align.insert(v.clone(), v.clone());
    }

    for layer in layering {
        // Rightmost neighbor position taken by an alignment in this layer.
        let mut claimed: Option<usize> = None;
        for v in layer {
            let mut ws: Vec<(usize, NodeId)> = neighbors(v.as_str())
                .into_iter()
                .filter_map(|w| Some((*pos.get(w.as_str())?, w)))
                .collect();
            ws.sort_by_key(|&(p, _)| p);
            let Some(last) = ws.len().checked_sub(1) else {
                continue;
            };

            for (w_pos, w) in &ws[last / 2..=last.div_ceil(2)] {
                if blocks.align.get(v).is_some_and(|a| a != v) {
                    break;
                }
                if claimed.is_some_and(|c| c >= *w_pos) || conflicts.contains(v, w) {
                    continue;
                }
                let w_root = blocks.root.get(w).cloned().unwrap_or_else(|| w.clone());
                blocks.align.insert(w.clone(), v.clone());
                blocks.align.insert(v.clone(), w_root.clone());
                blocks.root.insert(v.clone(), w_root);
                claimed = Some(*w_pos);
            }
        }
    }

    blocks
}

/// Separation-weighted DAG over block roots; `u -> v` when a node of `u` sits directly left of
/// a node of `v` in some layer.
#[derive(Debug, Default)]
struct BlockGraph {
    nodes: IndexMap<NodeId, ()>,
    edges: IndexMap<(NodeId, NodeId), f64>,
    preds: HashMap<NodeId, Vec<NodeId>>,
    succs: HashMap<NodeId, Vec<NodeId>>,
}

impl BlockGraph {
    fn build(
        layering: &Layering,
        root: &HashMap<NodeId, NodeId>,
        sep: &impl Fn(&str, &str) -> f64,
    ) -> Self {
        let mut g = Self::default();
        for layer in layering {
            let mut u: Option<&NodeId> = None;
            for v in layer {
                let v_root = root.get(v).unwrap_or(v).clone();
                g.nodes.entry(v_root.clone()).or_default();
                if let Some(u) = u {
                    let u_root = root.get(u).unwrap_or(u).clone();
                    g.set_edge(u_root, v_root, sep(u.as_str(), v.as_str()));
                }
                u = Some(v);
            }
        }
        g
    }

    fn set_edge(&mut self, u: NodeId, v: NodeId, weight: f64) {
        match self.edges.get_mut(&(u.clone(), v.clone())) {
            Some(w) => *w = w.max(weight),
            None => {
                self.preds.entry(v.clone()).or_default().push(u.clone());
                self.succs.entry(u.clone()).or_default().push(v.clone());
                self.edges.insert((u, v), weight);
            }
        }
    }

    fn weight(&self, u: &str, v: &str) -> f64 {
        self.edges
            .get(&(u.to_string(), v.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    fn preds(&self, v: &str) -> &[NodeId] {
        self.preds.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    fn succs(&self, v: &str) -> &[NodeId] {
        self.succs.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Post-order over `next`: `set` runs on a node after it ran on everything `next` reaches.
    fn iterate(&self, mut set: impl FnMut(&str), next: impl Fn(&str) -> Vec<NodeId>) {
        let mut stack: Vec<NodeId> = self.nodes.keys().cloned().collect();
        let mut visited: HashMap<NodeId, bool> = HashMap::default();
        while let Some(elem) = stack.pop() {
            if visited.get(&elem).copied().unwrap_or(false) {
                set(elem.as_str());
                continue;
            }
            visited.insert(elem.clone(), true);
            stack.push(elem.clone());
            stack.extend(next(elem.as_str()));
        }
    }
}

/// Assigns block coordinates: smallest feasible coordinates first, then every block is pulled
/// towards its right neighbors as far as the separations allow.
pub fn horizontal_compaction(
    layering: &Layering,
    root: &HashMap<NodeId, NodeId>,
    sep: impl Fn(&str, &str) -> f64,
) -> Xs {
    let block_g = BlockGraph::build(layering, root, &sep);
    let mut xs: Xs = HashMap::default();

    block_g.iterate(
        |elem| {
            let best = block_g
                .preds(elem)
                .iter()
                .map(|u| xs.get(u).copied().unwrap_or(0.0) + block_g.weight(u, elem))
                .fold(0.0, f64::max);
            xs.insert(elem.to_string(), best);
        },
        |elem| block_g.preds(elem).to_vec(),
    );

    block_g.iterate(
        |elem| {
            let min = block_g
                .succs(elem)
                .iter()
                .map(|w| xs.get(w).copied().unwrap_or(0.0) - block_g.weight(elem, w))
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() {
                let cur = xs.get(elem).copied().unwrap_or(0.0);
                xs.insert(elem.to_string(), cur.max(min));
            }
        },
        |elem| block_g.succs(elem).to_vec(),
    );

    let mut out: Xs = HashMap::default();
    for layer in layering {
        for v in layer {
            let r = root.get(v).unwrap_or(v);
            out.insert(v.clone(), xs.get(r).copied().unwrap_or(0.0));
        }
    }
    out
}

/// The alignment with the smallest extent; ties go to the earlier of `ul, ur, dl, dr`.
pub fn find_smallest_width_alignment(
    xss: &BTreeMap<Alignment, Xs>,
    extent: impl Fn(&str) -> f64,
) -> Option<Alignment> {
    let mut best: Option<(Alignment, f64)> = None;
    for (&alignment, xs) in xss {
        let mut max: f64 = f64::NEG_INFINITY;
        let mut min: f64 = f64::INFINITY;
        for (v, x) in xs {
            let half = extent(v.as_str()) / 2.0;
            max = max.max(x + half);
            min = min.min(x - half);
        }
        let width = max - min;
        if best.is_none_or(|(_, w)| width < w) {
            best = Some((alignment, width));
        }
    }
    best.map(|(a, _)| a)
}

/// Shifts left-aligned assignments onto the minimum of `align_to` and right-aligned ones onto
/// its maximum.
pub fn align_coordinates(xss: &mut BTreeMap<Alignment, Xs>, align_to: Alignment) {
    let Some(target) = xss.get(&align_to) else {
        return;
    };
    let (align_min, align_max) = min_max(target);

    for (alignment, xs) in xss.iter_mut() {
        if xs.is_empty() {
            continue;
        }
        let (xs_min, xs_max) = min_max(xs);
        let delta = if alignment.left_to_right() {
            align_min - xs_min
        } else {
            align_max - xs_max
        };
        if delta != 0.0 {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

/// Median of the four assignments, or the `single` one when pinned.
pub fn balance(xss: &BTreeMap<Alignment, Xs>, single: Option<Alignment>) -> Xs {
    if let Some(alignment) = single {
        return xss.get(&alignment).cloned().unwrap_or_default();
    }
    let Some(reference) = xss.get(&Alignment::Ul) else {
        return Xs::default();
    };

    reference
        .keys()
        .filter_map(|v| {
            let mut vals = [0.0; 4];
            for (slot, alignment) in vals.iter_mut().zip(Alignment::ALL) {
                *slot = *xss.get(&alignment)?.get(v)?;
            }
            vals.sort_by(f64::total_cmp);
            Some((v.clone(), (vals[1] + vals[2]) / 2.0))
        })
        .collect()
}

/// In-layer coordinate of every node of `layering`.
///
/// `extent` is a node's size along the in-layer axis; neighbors in a layer end up at least
/// `vertex_sep + (extent(u) + extent(v)) / 2` apart.
pub fn position_x(
    layering: &Layering,
    adjacency: &Adjacency,
    conflicts: &Conflicts,
    extent: impl Fn(&str) -> f64,
    vertex_sep: f64,
    single: Option<Alignment>,
) -> Xs {
    let sep = |u: &str, v: &str| vertex_sep + (extent(u) + extent(v)) / 2.0;
    let mut xss: BTreeMap<Alignment, Xs> = BTreeMap::new();

    for alignment in Alignment::ALL {
        let mut adjusted: Layering = if alignment.top_down() {
            layering.clone()
        } else {
            layering.iter().rev().cloned().collect()
        };
        if !alignment.left_to_right() {
            for layer in &mut adjusted {
                layer.reverse();
            }
        }

        let blocks = vertical_alignment(&adjusted, conflicts, |v| {
            if alignment.top_down() {
                adjacency.uppers(v).to_vec()
            } else {
                adjacency.lowers(v).to_vec()
            }
        });
        let mut xs = horizontal_compaction(&adjusted, &blocks.root, sep);
        if !alignment.left_to_right() {
            let (_, max) = min_max(&xs);
            for x in xs.values_mut() {
                *x = max - *x;
            }
        }
        xss.insert(alignment, xs);
    }

    if let Some(smallest) = find_smallest_width_alignment(&xss, &extent) {
        align_coordinates(&mut xss, smallest);
    }
    balance(&xss, single)
}

fn min_max(xs: &Xs) -> (f64, f64) {
    xs.values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}
