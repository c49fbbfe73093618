//! Disposable directed-graph projection used by cycle breaking.
//!
//! Nodes keep their insertion order across removals, which is what makes `any_sink`,
//! `any_source` and `max_out_minus_in_node` deterministic: each returns the first qualifying
//! node in that order.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
struct Entry {
    ins: Vec<usize>,
    outs: Vec<usize>,
    in_degree: usize,
    out_degree: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GraphView {
    nodes: IndexMap<String, Entry>,
    arcs: Vec<(String, String)>,
    alive: Vec<bool>,
}

impl GraphView {
    /// Arcs whose endpoints are not in `nodes` are ignored.
    pub fn new<'a>(
        nodes: impl IntoIterator<Item = &'a str>,
        arcs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut view = Self::default();
        for v in nodes {
            view.nodes.entry(v.to_string()).or_default();
        }
        for (v, w) in arcs {
            if !view.nodes.contains_key(v) || !view.nodes.contains_key(w) {
                continue;
            }
            let ix = view.arcs.len();
            view.arcs.push((v.to_string(), w.to_string()));
            view.alive.push(true);
            if let Some(e) = view.nodes.get_mut(v) {
                e.outs.push(ix);
                e.out_degree += 1;
            }
            if let Some(e) = view.nodes.get_mut(w) {
                e.ins.push(ix);
                e.in_degree += 1;
            }
        }
        view
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, v: &str) -> bool {
        self.nodes.contains_key(v)
    }

    pub fn in_degree(&self, v: &str) -> usize {
        self.nodes.get(v).map(|e| e.in_degree).unwrap_or(0)
    }

    pub fn out_degree(&self, v: &str) -> usize {
        self.nodes.get(v).map(|e| e.out_degree).unwrap_or(0)
    }

    /// Out-degree minus in-degree.
    pub fn delta(&self, v: &str) -> i64 {
        self.out_degree(v) as i64 - self.in_degree(v) as i64
    }

    /// Removes `v` and every arc incident to it. Returns `false` if `v` was not present.
    pub fn remove_node(&mut self, v: &str) -> bool {
        let Some(entry) = self.nodes.shift_remove(v) else {
            return false;
        };
        for ix in entry.outs.into_iter().chain(entry.ins) {
            if !std::mem::replace(&mut self.alive[ix], false) {
                continue;
            }
            let (from, to) = &self.arcs[ix];
            if let Some(e) = self.nodes.get_mut(from) {
                e.out_degree -= 1;
            }
            if let Some(e) = self.nodes.get_mut(to) {
                e.in_degree -= 1;
            }
        }
        true
    }

    pub fn remove_nodes<'a>(&mut self, vs: impl IntoIterator<Item = &'a str>) {
        for v in vs {
            self.remove_node(v);
        }
    }

    pub fn any_sink(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|(_, e)| e.out_degree == 0)
            .map(|(v, _)| v.as_str())
    }

    pub fn any_source(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|(_, e)| e.in_degree == 0)
            .map(|(v, _)| v.as_str())
    }

    /// Node maximizing out-degree minus in-degree; ties go to the earliest inserted node.
    pub fn max_out_minus_in_node(&self) -> Option<&str> {
        let mut best: Option<(&str, i64)> = None;
        for (v, e) in &self.nodes {
            let delta = e.out_degree as i64 - e.in_degree as i64;
            if best.is_none_or(|(_, d)| delta > d) {
                best = Some((v.as_str(), delta));
            }
        }
        best.map(|(v, _)| v)
    }
}
