//! Recompute Engine
//!
//! Drives a graph's computations against one record. The host decides *when*
//! these run — typically just before persisting a mutated record, or on an
//! explicit recompute request — and the engine decides *what* runs and in
//! what order. Nothing here is wired into a save hook; invocation is always
//! explicit.
//!
//! A pass over one record is strictly sequential: later computations read
//! values written by earlier ones. A transform failure aborts the rest of
//! the pass and is reported with the failing target; writes already applied
//! stay on the record. Transforms are pure, so the host can always retry a
//! failed pass from scratch.

use tracing::{debug, trace};

use crate::computation::Computation;
use crate::error::RecomputeError;
use crate::graph::ComputationGraph;
use crate::record::Record;

/// Recompute every derived field whose inputs changed, in dependency order.
///
/// The changed set comes from the record's own change tracking. Returns the
/// targets that were recomputed, in the order they ran.
pub fn recompute_changed<R: Record>(
    graph: &ComputationGraph,
    record: &mut R,
) -> Result<Vec<String>, RecomputeError> {
    let changed = record.changed_properties();
    let triggered = graph.computations_triggered_by(&changed);
    apply_all(&triggered, record)
}

/// Recompute every derived field, in dependency order.
pub fn recompute_all<R: Record>(
    graph: &ComputationGraph,
    record: &mut R,
) -> Result<Vec<String>, RecomputeError> {
    let all: Vec<&Computation> = graph.ordered_computations().collect();
    apply_all(&all, record)
}

/// Recompute exactly the named targets, in the order given.
///
/// Fails with [`GraphError::UnknownTarget`](crate::error::GraphError) before
/// touching the record if any name has no declaration. The caller owns the
/// ordering here; use [`recompute_changed`] when dependency order matters.
pub fn recompute_targets<R: Record>(
    graph: &ComputationGraph,
    record: &mut R,
    targets: &[&str],
) -> Result<Vec<String>, RecomputeError> {
    let requested = targets
        .iter()
        .map(|target| graph.require(target))
        .collect::<Result<Vec<&Computation>, _>>()?;
    apply_all(&requested, record)
}

fn apply_all<R: Record>(
    computations: &[&Computation],
    record: &mut R,
) -> Result<Vec<String>, RecomputeError> {
    let mut applied = Vec::with_capacity(computations.len());
    for computation in computations {
        trace!(property = computation.target(), "applying computation");
        computation
            .apply(record)
            .map_err(|source| RecomputeError::Transform {
                target: computation.target().to_owned(),
                source,
            })?;
        applied.push(computation.target().to_owned());
    }
    debug!(applied = applied.len(), "recompute pass finished");
    Ok(applied)
}
