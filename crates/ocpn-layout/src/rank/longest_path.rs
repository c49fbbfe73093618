use super::{LayerProblem, LayerSolver};
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Longest-path layering: sinks sit on the bottom layer and every other node sits one layer
/// above its highest successor. Optimal in height, not in total span.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestPathSolver;

impl LayerSolver for LongestPathSolver {
    fn name(&self) -> &'static str {
        "longest-path"
    }

    fn solve(&self, problem: &LayerProblem) -> Result<Vec<usize>> {
        let n = problem.node_count;
        let mut lowers: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree: Vec<usize> = vec![0; n];
        for &(upper, lower) in &problem.arcs {
            if upper >= n || lower >= n {
                return Err(self.infeasible(format!("arc {upper} -> {lower} is out of range")));
            }
            lowers[upper].push(lower);
            in_degree[lower] += 1;
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
        let mut topo: Vec<usize> = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            topo.push(v);
            for &w in &lowers[v] {
                in_degree[w] -= 1;
                if in_degree[w] == 0 {
                    queue.push_back(w);
                }
            }
        }
        if topo.len() != n {
            return Err(self.infeasible("the arc constraints contain a cycle"));
        }

        // Ranks grow upwards from 0 at the sinks, then get flipped into layers.
        let mut rank: Vec<i64> = vec![0; n];
        for &v in topo.iter().rev() {
            rank[v] = lowers[v]
                .iter()
                .map(|&w| rank[w] - 1)
                .min()
                .unwrap_or(0);
        }
        let top = rank.iter().copied().min().unwrap_or(0);
        Ok(rank.into_iter().map(|r| (r - top) as usize).collect())
    }
}

impl LongestPathSolver {
    fn infeasible(&self, message: impl Into<String>) -> Error {
        Error::SolverInfeasible {
            solver: self.name().to_string(),
            message: message.into(),
        }
    }
}
