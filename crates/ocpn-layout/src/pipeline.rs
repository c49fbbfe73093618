//! End-to-end layout: the seven stages run in order over one `Layout`.

use crate::config::{Config, Ranker};
use crate::error::Result;
use crate::layout::Layout;
use crate::net::Net;
use crate::rank::{IlpSolver, LayerSolver, LongestPathSolver};
use crate::{acyclic, normalize, order, position, rank, route};
use std::time::Duration;

pub struct Pipeline {
    config: Config,
    solver: Box<dyn LayerSolver>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl Pipeline {
    /// Validates `config` and picks the layer solver named by `config.ranker`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let solver: Box<dyn LayerSolver> = match config.ranker {
            Ranker::Ilp => Box::new(IlpSolver::new(
                config.solver_timeout_ms.map(Duration::from_millis),
            )),
            Ranker::LongestPath => Box::new(LongestPathSolver),
        };
        Ok(Self { config, solver })
    }

    /// Replaces the layer solver.
    pub fn with_solver(mut self, solver: impl LayerSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    pub fn run(&self, net: &Net) -> Result<Layout> {
        let config = &self.config;
        let mut layout = Layout::from_net(net);
        tracing::debug!(
            nodes = layout.nodes.len(),
            arcs = layout.arcs.len(),
            solver = self.solver.name(),
            "starting layout"
        );

        tracing::debug_span!("acyclic").in_scope(|| acyclic::run(&mut layout, config))?;
        tracing::debug_span!("rank").in_scope(|| rank::run(&mut layout, self.solver.as_ref()))?;
        tracing::debug_span!("normalize").in_scope(|| normalize::run(&mut layout))?;
        tracing::debug_span!("order").in_scope(|| order::run(&mut layout, config))?;
        tracing::debug_span!("position").in_scope(|| position::run(&mut layout, config))?;
        tracing::debug_span!("route").in_scope(|| route::run(&mut layout))?;

        Ok(layout)
    }
}
