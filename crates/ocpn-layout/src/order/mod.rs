//! Crossing reduction.

mod attraction;
mod barycenter;
mod cross_count;
mod ordering;

pub use cross_count::cross_count;
pub use ordering::{OrderOutcome, order_layering};

use crate::config::Config;
use crate::error::Result;
use crate::layout::{Layout, LayoutStage};
use crate::model::Layering;
use ordering::{OrderContext, order_with};

/// Sum over object types of the mean absolute deviation of their places' in-layer indices.
pub fn attraction_deviation(layout: &Layout, layering: &Layering) -> f64 {
    attraction::deviation(layering, &attraction::object_types(layout))
}

pub fn run(layout: &mut Layout, config: &Config) -> Result<()> {
    layout.ensure_stage(LayoutStage::ProperlyLayered)?;

    let outcome = {
        let ctx = OrderContext::new(layout, config);
        order_with(&ctx, layout.layering.clone(), config)
    };
    tracing::debug!(
        crossings = outcome.crossings,
        score = outcome.score,
        sweeps = outcome.sweeps,
        "vertex ordering finished"
    );

    layout.layering = outcome.layering;
    layout.stats.crossings = outcome.crossings;
    layout.stats.ordering_score = outcome.score;
    layout.stats.ordering_sweeps = outcome.sweeps;
    layout.assign_positions()?;
    layout.advance(LayoutStage::ProperlyLayered)
}
