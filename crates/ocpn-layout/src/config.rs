//! Layout configuration.
//!
//! `Config` is a read-only snapshot consumed by every stage. It deserializes from the camelCase
//! JSON shape used by front-ends; any missing field falls back to [`Config::default`].

use crate::error::{Error, Result};
use crate::model::{NodeKind, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    TopToBottom,
    LeftToRight,
}

/// Layer assignment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    /// Integer program solved by an MILP backend.
    #[default]
    Ilp,
    /// Longest-path layering; no solver involved.
    LongestPath,
}

/// One of the four vertical/horizontal sweep combinations of coordinate assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Top-down, left-to-right.
    Ul,
    /// Top-down, right-to-left.
    Ur,
    /// Bottom-up, left-to-right.
    Dl,
    /// Bottom-up, right-to-left.
    Dr,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [Self::Ul, Self::Ur, Self::Dl, Self::Dr];

    pub fn top_down(self) -> bool {
        matches!(self, Self::Ul | Self::Ur)
    }

    pub fn left_to_right(self) -> bool {
        matches!(self, Self::Ul | Self::Dl)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub direction: Direction,
    /// Weight in `[0, 1]` of the object-type barycenter for places.
    pub object_attraction: f64,
    pub object_attraction_range_min: usize,
    pub object_attraction_range_max: usize,
    pub max_barycenter_iterations: usize,
    pub vertex_sep: f64,
    pub layer_sep: f64,
    pub border_padding: f64,
    pub place_radius: f64,
    pub transition_width: f64,
    pub transition_height: f64,
    pub silent_transition_width: f64,
    /// Node ids forced to the front of the cycle-breaking order.
    pub sources: Vec<String>,
    /// Node ids forced to the back of the cycle-breaking order.
    pub sinks: Vec<String>,
    /// Object type -> rank; lower ranks are placed further left in place-only layers.
    pub object_centrality: Option<BTreeMap<String, u32>>,
    /// Use a single alignment instead of the balanced median of all four.
    pub single_direction: Option<Alignment>,
    pub ranker: Ranker,
    pub solver_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            object_attraction: 0.1,
            object_attraction_range_min: 2,
            object_attraction_range_max: 4,
            max_barycenter_iterations: 4,
            vertex_sep: 20.0,
            layer_sep: 40.0,
            border_padding: 10.0,
            place_radius: 10.0,
            transition_width: 40.0,
            transition_height: 20.0,
            silent_transition_width: 10.0,
            sources: Vec::new(),
            sinks: Vec::new(),
            object_centrality: None,
            single_direction: None,
            ranker: Ranker::Ilp,
            solver_timeout_ms: Some(30_000),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.object_attraction) {
            return Err(invalid(format!(
                "objectAttraction must be within [0, 1], got {}",
                self.object_attraction
            )));
        }
        if self.max_barycenter_iterations == 0 {
            return Err(invalid("maxBarycenterIterations must be at least 1"));
        }
        if self.object_attraction_range_min == 0 {
            return Err(invalid("objectAttractionRangeMin must be at least 1"));
        }
        if self.object_attraction_range_min > self.object_attraction_range_max {
            return Err(invalid(format!(
                "objectAttractionRangeMin ({}) exceeds objectAttractionRangeMax ({})",
                self.object_attraction_range_min, self.object_attraction_range_max
            )));
        }
        for (name, value) in [
            ("vertexSep", self.vertex_sep),
            ("layerSep", self.layer_sep),
            ("borderPadding", self.border_padding),
            ("placeRadius", self.place_radius),
            ("transitionWidth", self.transition_width),
            ("transitionHeight", self.transition_height),
            ("silentTransitionWidth", self.silent_transition_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Layer offsets searched for same-type places: `min, min + 2, ..` up to `max`.
    pub fn attraction_offsets(&self) -> Vec<usize> {
        (self.object_attraction_range_min..=self.object_attraction_range_max)
            .step_by(2)
            .collect()
    }

    pub fn node_size(&self, kind: &NodeKind) -> Size {
        match kind {
            NodeKind::Place(_) => Size {
                width: self.place_radius * 2.0,
                height: self.place_radius * 2.0,
            },
            NodeKind::Transition(t) if t.silent => Size {
                width: self.silent_transition_width,
                height: self.transition_height,
            },
            NodeKind::Transition(_) => Size {
                width: self.transition_width,
                height: self.transition_height,
            },
            NodeKind::Dummy(_) => Size::default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig {
        message: message.into(),
    }
}
