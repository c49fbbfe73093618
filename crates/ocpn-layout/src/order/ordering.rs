use super::attraction::{apply_centrality, deviation, object_types, window_type_means};
use super::barycenter::{fill_missing, neighbor_barycenter, place_barycenter, sort_by_barycenter};
use super::cross_count::cross_count;
use crate::config::Config;
use crate::layout::{Adjacency, Layout};
use crate::model::Layering;
use rustc_hash::FxHashMap as HashMap;

/// Result of [`order_layering`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcome {
    pub layering: Layering,
    /// `crossings + objectAttraction * deviation` of `layering`.
    pub score: f64,
    pub crossings: usize,
    /// Completed down+up sweeps.
    pub sweeps: usize,
    /// Best score before the first sweep and after each sweep.
    pub best_scores: Vec<f64>,
}

pub(crate) struct OrderContext<'a> {
    adjacency: Adjacency,
    object_types: HashMap<&'a str, &'a str>,
    attraction: f64,
    offsets: Vec<usize>,
}

impl<'a> OrderContext<'a> {
    pub(crate) fn new(layout: &'a Layout, config: &Config) -> Self {
        Self {
            adjacency: layout.adjacency(),
            object_types: object_types(layout),
            attraction: config.object_attraction,
            offsets: config.attraction_offsets(),
        }
    }

    pub(crate) fn score(&self, layering: &Layering) -> (f64, usize) {
        let crossings = cross_count(layering, &self.adjacency);
        let score = crossings as f64 + self.attraction * deviation(layering, &self.object_types);
        (score, crossings)
    }

    /// Reorders layer `l` against the already fixed layer `fixed`.
    fn reorder(&self, layering: &mut Layering, l: usize, fixed: usize) {
        let downward = fixed < l;
        let fixed_pos: HashMap<&str, usize> = layering[fixed]
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let type_means = window_type_means(layering, l, &self.object_types, &self.offsets);

        let raw: Vec<Option<f64>> = layering[l]
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let neighbors = if downward {
                    self.adjacency.uppers(v)
                } else {
                    self.adjacency.lowers(v)
                };
                let neighbor = neighbor_barycenter(neighbors, &fixed_pos);
                match self.object_types.get(v.as_str()) {
                    Some(object_type) => Some(place_barycenter(
                        neighbor,
                        type_means.get(object_type).copied(),
                        i,
                        self.attraction,
                    )),
                    None => neighbor,
                }
            })
            .collect();
        let barycenters = fill_missing(&raw);
        sort_by_barycenter(&mut layering[l], &barycenters);
    }

    fn sweep(&self, layering: &mut Layering) {
        let n = layering.len();
        for l in 1..n {
            self.reorder(layering, l, l - 1);
        }
        for l in (0..n.saturating_sub(1)).rev() {
            self.reorder(layering, l, l + 1);
        }
    }
}

/// Barycenter crossing reduction with object attraction.
///
/// Sweeps until `maxBarycenterIterations` consecutive sweeps fail to improve on the best
/// score, or until a sweep reproduces a layering already seen. Returns the best layering
/// encountered, the input (after the centrality pre-sort) included.
pub fn order_layering(layout: &Layout, layering: Layering, config: &Config) -> OrderOutcome {
    let ctx = OrderContext::new(layout, config);
    order_with(&ctx, layering, config)
}

pub(crate) fn order_with(
    ctx: &OrderContext<'_>,
    mut layering: Layering,
    config: &Config,
) -> OrderOutcome {
    if let Some(centrality) = &config.object_centrality {
        apply_centrality(&mut layering, &ctx.object_types, centrality);
    }

    let (mut best_score, mut best_crossings) = ctx.score(&layering);
    let mut best: Layering = layering.clone();
    let mut best_scores: Vec<f64> = vec![best_score];
    let mut history: Vec<Layering> = vec![layering.clone()];

    let mut sweeps = 0usize;
    let mut since_best = 0usize;
    loop {
        ctx.sweep(&mut layering);
        sweeps += 1;

        let (score, crossings) = ctx.score(&layering);
        if score < best_score {
            best_score = score;
            best_crossings = crossings;
            best = layering.clone();
            since_best = 0;
        } else {
            since_best += 1;
        }
        best_scores.push(best_score);

        if since_best >= config.max_barycenter_iterations {
            break;
        }
        if history.contains(&layering) {
            tracing::trace!(sweeps, "ordering reproduced an earlier layering");
            break;
        }
        history.push(layering.clone());
    }

    OrderOutcome {
        layering: best,
        score: best_score,
        crossings: best_crossings,
        sweeps,
        best_scores,
    }
}
