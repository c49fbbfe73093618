//! Object-type cohesion: type barycenters, the deviation term of the ordering score, and the
//! optional centrality pre-sort.

use crate::layout::Layout;
use crate::model::{Layering, NodeId};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

/// Object type of every place in `layout`.
pub(crate) fn object_types(layout: &Layout) -> HashMap<&str, &str> {
    layout
        .nodes
        .values()
        .filter_map(|n| Some((n.id.as_str(), n.object_type()?)))
        .collect()
}

/// Mean index of each object type's places over the layers `layer ± d`, `d` in `offsets`.
pub(crate) fn window_type_means<'t>(
    layering: &Layering,
    layer: usize,
    object_types: &HashMap<&str, &'t str>,
    offsets: &[usize],
) -> HashMap<&'t str, f64> {
    let mut acc: HashMap<&'t str, (f64, usize)> = HashMap::default();
    for &d in offsets {
        let above = layer.checked_sub(d);
        let below = Some(layer + d).filter(|&l| l < layering.len());
        for l in [above, below].into_iter().flatten() {
            for (i, v) in layering[l].iter().enumerate() {
                if let Some(&object_type) = object_types.get(v.as_str()) {
                    let entry = acc.entry(object_type).or_insert((0.0, 0));
                    entry.0 += i as f64;
                    entry.1 += 1;
                }
            }
        }
    }
    acc.into_iter()
        .map(|(t, (sum, count))| (t, sum / count as f64))
        .collect()
}

/// Sum over object types of the mean absolute deviation of their places' in-layer indices.
pub(crate) fn deviation(layering: &Layering, object_types: &HashMap<&str, &str>) -> f64 {
    let mut ranks: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(&object_type) = object_types.get(v.as_str()) {
                ranks.entry(object_type).or_default().push(i as f64);
            }
        }
    }
    ranks
        .values()
        .map(|rs| {
            let n = rs.len() as f64;
            let mean = rs.iter().sum::<f64>() / n;
            rs.iter().map(|r| (r - mean).abs()).sum::<f64>() / n
        })
        .sum()
}

/// Stable re-sort of every place-only layer by the centrality rank of its object types.
/// Unranked types go last.
pub(crate) fn apply_centrality(
    layering: &mut Layering,
    object_types: &HashMap<&str, &str>,
    centrality: &BTreeMap<String, u32>,
) {
    let key = |v: &NodeId| -> (bool, u32) {
        match object_types.get(v.as_str()).and_then(|t| centrality.get(*t)) {
            Some(&rank) => (false, rank),
            None => (true, 0),
        }
    };
    for layer in layering.iter_mut() {
        if layer.is_empty() || !layer.iter().all(|v| object_types.contains_key(v.as_str())) {
            continue;
        }
        layer.sort_by_key(key);
    }
}
