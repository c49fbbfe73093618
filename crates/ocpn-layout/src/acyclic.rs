//! Cycle breaking by a seeded greedy feedback arc set (Eades, Lin & Smyth).
//!
//! The heuristic produces a total node order; every arc pointing backwards in that order is
//! flagged `reversed`. Arcs keep their endpoints, later stages read the logical direction
//! through `Arc::upper` / `Arc::lower`.

use crate::config::Config;
use crate::error::Result;
use crate::graph_view::GraphView;
use crate::layout::{Layout, LayoutStage};
use rustc_hash::FxHashMap as HashMap;
use rustc_hash::FxHashSet as HashSet;
use std::collections::VecDeque;

/// Total order `s1 ++ s2` over the nodes of `view`.
///
/// `sources` are placed first and `sinks` last, each sorted by descending out-minus-in degree
/// (stable, so equal degrees keep the caller's order). Ids unknown to the view are ignored; a
/// node listed in both seed lists counts as a source.
pub fn feedback_order(mut view: GraphView, sources: &[String], sinks: &[String]) -> Vec<String> {
    let mut seeded: HashSet<&str> = HashSet::default();
    let mut s1: Vec<String> = seed(&view, sources, &mut seeded);
    let mut s2: VecDeque<String> = seed(&view, sinks, &mut seeded).into();

    view.remove_nodes(s1.iter().map(String::as_str));
    view.remove_nodes(s2.iter().map(String::as_str));

    while !view.is_empty() {
        while let Some(v) = view.any_sink().map(str::to_string) {
            view.remove_node(&v);
            s2.push_front(v);
        }
        while let Some(v) = view.any_source().map(str::to_string) {
            view.remove_node(&v);
            s1.push(v);
        }
        if let Some(v) = view.max_out_minus_in_node().map(str::to_string) {
            view.remove_node(&v);
            s1.push(v);
        }
    }

    s1.extend(s2);
    s1
}

fn seed<'a>(view: &GraphView, ids: &'a [String], seeded: &mut HashSet<&'a str>) -> Vec<String> {
    let mut out: Vec<String> = ids
        .iter()
        .filter(|id| view.contains(id) && seeded.insert(id.as_str()))
        .cloned()
        .collect();
    out.sort_by_key(|v| std::cmp::Reverse(view.delta(v)));
    out
}

pub fn run(layout: &mut Layout, config: &Config) -> Result<()> {
    layout.ensure_stage(LayoutStage::Raw)?;

    let view = GraphView::new(
        layout.nodes.keys().map(String::as_str),
        layout
            .arcs
            .values()
            .map(|a| (a.source.as_str(), a.target.as_str())),
    );
    let order = feedback_order(view, &config.sources, &config.sinks);
    let index: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut reversed = 0usize;
    for arc in layout.arcs.values_mut() {
        let (Some(s), Some(t)) = (index.get(arc.source.as_str()), index.get(arc.target.as_str()))
        else {
            continue;
        };
        arc.reversed = s > t;
        reversed += usize::from(arc.reversed);
    }
    layout.stats.reversed_arcs = reversed;
    tracing::debug!(arcs = layout.arcs.len(), reversed, "cycle breaking finished");

    layout.advance(LayoutStage::Raw)
}
