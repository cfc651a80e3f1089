//! Error Types
//!
//! Structural errors (cyclic declarations, unknown targets) are detected at
//! the earliest possible point: declaration time for cycles, lookup time for
//! unknown targets. They are never deferred to evaluation time, because a
//! graph never commits a cyclic state.
//!
//! Transform failures are the one evaluation-time error. The engine treats
//! them as opaque: they abort the current record's recompute pass and
//! propagate to the caller with the failing target attached. Writes already
//! applied to the record are not rolled back.

use thiserror::Error;

/// Opaque failure produced by a transform function.
///
/// Transforms are pure and idempotent besides the single target write, so a
/// host is always free to re-run a failed pass; the engine itself never
/// retries.
pub type TransformError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A declaration was structurally invalid before it ever reached a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The computation declares no source properties, so it could never be
    /// triggered by a change.
    #[error("computation for '{0}' declares no source properties")]
    NoSources(String),

    /// The computation reads its own target, the degenerate one-node cycle.
    #[error("computation for '{0}' depends on its own target")]
    SelfDependency(String),
}

/// A set of declarations contradicts itself: following source edges from a
/// target leads back to that target.
///
/// `cycle` holds the member targets in traversal order, closed by repeating
/// the first member, e.g. `["a", "b", "a"]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency among computed properties: {}", .cycle.join(" -> "))]
pub struct CyclicDependency {
    /// One full cycle, as an ordered list of target properties.
    pub cycle: Vec<String>,
}

/// Errors reported by [`ComputationGraph`](crate::graph::ComputationGraph)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An insert would have committed a cyclic dependency graph. The graph's
    /// prior state is left unchanged.
    #[error(transparent)]
    Cyclic(#[from] CyclicDependency),

    /// A lookup named a target no computation declares.
    #[error("no computation declared for property '{0}'")]
    UnknownTarget(String),
}

/// Errors surfaced by the [`engine`](crate::engine) while driving a recompute
/// pass over one record.
#[derive(Debug, Error)]
pub enum RecomputeError {
    /// A structural graph error, currently only an unknown explicit target.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A transform failed mid-pass. Computations earlier in the order have
    /// already written their targets.
    #[error("computation for '{target}' failed")]
    Transform {
        /// The target whose transform failed.
        target: String,
        /// The underlying failure, unmodified.
        #[source]
        source: TransformError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_dependency_display_closes_the_loop() {
        let err = CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "circular dependency among computed properties: a -> b -> a"
        );
    }

    #[test]
    fn unknown_target_names_the_property() {
        let err = GraphError::UnknownTarget("total".into());
        assert_eq!(
            err.to_string(),
            "no computation declared for property 'total'"
        );
    }

    #[test]
    fn recompute_error_preserves_transform_source() {
        use std::error::Error as _;

        let inner: TransformError = "subtotal was null".into();
        let err = RecomputeError::Transform {
            target: "tax".into(),
            source: inner,
        };
        assert_eq!(err.to_string(), "computation for 'tax' failed");
        assert_eq!(err.source().unwrap().to_string(), "subtotal was null");
    }
}
