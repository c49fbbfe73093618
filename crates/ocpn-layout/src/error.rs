/// Rejected net construction input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("arc {arc_id} connects {source_id} to {target_id}, but arcs must join a place and a transition")]
    NonBipartiteArc {
        arc_id: String,
        source_id: String,
        target_id: String,
    },

    #[error("arc {arc_id} references unknown node {node_id}")]
    UnknownEndpoint { arc_id: String, node_id: String },

    #[error("duplicate id: {id}")]
    DuplicateId { id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layer assignment is infeasible ({solver}): {message}")]
    SolverInfeasible { solver: String, message: String },

    #[error("layer solver {solver} is unavailable: {message}")]
    SolverUnavailable { solver: String, message: String },

    #[error("layer solver {solver} did not finish within {timeout_ms} ms")]
    SolverTimeout { solver: String, timeout_ms: u64 },

    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
