use crate::model::NodeId;
use rustc_hash::FxHashMap as HashMap;

/// Offset given to a vertex without neighbors relative to its left neighbor's barycenter.
pub(crate) const MISSING_NEIGHBOR_EPSILON: f64 = 1e-3;

/// Mean position of `neighbors` in the fixed layer; `None` when none of them is there.
pub(crate) fn neighbor_barycenter(
    neighbors: &[NodeId],
    fixed: &HashMap<&str, usize>,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for w in neighbors {
        if let Some(&pos) = fixed.get(w.as_str()) {
            sum += pos as f64;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Barycenter of a place: the neighbor term blended with the object-type term.
pub(crate) fn place_barycenter(
    neighbor: Option<f64>,
    object_type: Option<f64>,
    current: usize,
    attraction: f64,
) -> f64 {
    match (neighbor, object_type) {
        (Some(n), Some(t)) => (1.0 - attraction) * n + attraction * t,
        (None, Some(t)) => (1.0 - attraction) * current as f64 + attraction * t,
        (Some(n), None) => n,
        (None, None) => current as f64,
    }
}

/// Replaces each missing barycenter with its left neighbor's value plus
/// [`MISSING_NEIGHBOR_EPSILON`], or 0 at the left edge.
pub(crate) fn fill_missing(values: &[Option<f64>]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        let filled = match value {
            Some(v) => *v,
            None => out.last().map_or(0.0, |left| left + MISSING_NEIGHBOR_EPSILON),
        };
        out.push(filled);
    }
    out
}

/// Stable sort of `layer` by `barycenters`; equal values keep their relative order.
pub(crate) fn sort_by_barycenter(layer: &mut Vec<NodeId>, barycenters: &[f64]) {
    let mut keyed: Vec<(f64, NodeId)> = barycenters
        .iter()
        .copied()
        .zip(layer.drain(..))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    layer.extend(keyed.into_iter().map(|(_, v)| v));
}
