//! Computation Graph
//!
//! [`ComputationGraph`] owns every computation declared for one record type,
//! keyed by target property. On top of that storage it maintains two derived
//! structures, rebuilt synchronously on every insert:
//!
//! - the **total order**: all computations sequenced so that producers come
//!   before consumers, with ties broken by declaration order;
//! - the **trigger index**: for each property, the positions (in total order)
//!   of the computations that read it directly. The index doubles as the
//!   dependents adjacency for finding everything downstream of a change.
//!
//! Inserts are validate-then-commit: the candidate order is computed first,
//! and a cyclic result leaves the graph exactly as it was. Callers therefore
//! never observe a cyclic or partially rebuilt graph.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::debug;

use super::order::{self, Entry};
use crate::computation::Computation;
use crate::error::GraphError;

/// The dependency graph over one record type's derived-field declarations.
///
/// One graph per model type, not per record instance. Created empty, grown by
/// [`insert`](ComputationGraph::insert) at model-definition time; replacing a
/// target's computation is the only mutation after that.
#[derive(Default)]
pub struct ComputationGraph {
    /// Storage keyed by target. Iteration order is declaration order, which
    /// is what makes ordering ties deterministic; replacing a key keeps its
    /// original position.
    computations: IndexMap<String, Computation>,

    /// Targets in total evaluation order.
    order: Vec<String>,

    /// Property -> positions in `order` of computations reading it directly.
    readers: HashMap<String, Vec<usize>>,
}

impl ComputationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a computation, replacing any prior declaration for the same
    /// target, then rebuild the total order and trigger index.
    ///
    /// Fails with [`GraphError::Cyclic`] when the resulting declarations
    /// would contradict each other; the error names one full cycle. On
    /// failure the graph keeps its prior valid state.
    pub fn insert(&mut self, computation: Computation) -> Result<(), GraphError> {
        // Validate against a snapshot that already reflects the insert. A
        // replaced target keeps its original position, matching what the
        // IndexMap commit below will do.
        let mut entries: Vec<Entry<'_>> = Vec::with_capacity(self.computations.len() + 1);
        for (target, existing) in &self.computations {
            if target == computation.target() {
                entries.push((computation.target(), computation.sources()));
            } else {
                entries.push((target, existing.sources()));
            }
        }
        if !self.computations.contains_key(computation.target()) {
            entries.push((computation.target(), computation.sources()));
        }

        let order = order::evaluation_order(&entries)?;

        self.computations
            .insert(computation.target().to_owned(), computation);
        self.order = order;
        self.rebuild_readers();

        debug!(
            computations = self.computations.len(),
            "rebuilt evaluation order"
        );
        Ok(())
    }

    fn rebuild_readers(&mut self) {
        self.readers.clear();
        for (position, target) in self.order.iter().enumerate() {
            for source in self.computations[target].sources() {
                self.readers
                    .entry(source.clone())
                    .or_default()
                    .push(position);
            }
        }
    }

    /// All computations in total evaluation order.
    pub fn ordered_computations(&self) -> impl Iterator<Item = &Computation> {
        self.order.iter().map(|target| &self.computations[target])
    }

    /// The computation declaring `target`, if any.
    pub fn computation_for(&self, target: &str) -> Option<&Computation> {
        self.computations.get(target)
    }

    /// Like [`computation_for`](ComputationGraph::computation_for), but an
    /// undeclared target is an error. Used by explicit recompute requests.
    pub fn require(&self, target: &str) -> Result<&Computation, GraphError> {
        self.computations
            .get(target)
            .ok_or_else(|| GraphError::UnknownTarget(target.to_owned()))
    }

    /// Every computation that must re-run because one of `changed_properties`
    /// changed, in total evaluation order.
    ///
    /// Direct hits come from the trigger index; each hit's target then counts
    /// as changed too, pulling in everything transitively downstream. The
    /// result is the fixpoint of that expansion, filtered into total order.
    pub fn computations_triggered_by(
        &self,
        changed_properties: &HashSet<String>,
    ) -> Vec<&Computation> {
        let mut selected = vec![false; self.order.len()];
        let mut pending: VecDeque<usize> = changed_properties
            .iter()
            .filter_map(|property| self.readers.get(property))
            .flatten()
            .copied()
            .collect();

        while let Some(position) = pending.pop_front() {
            if selected[position] {
                continue;
            }
            selected[position] = true;

            // The newly selected computation will write its target, so every
            // direct reader of that target is triggered as well.
            if let Some(downstream) = self.readers.get(&self.order[position]) {
                pending.extend(downstream.iter().copied());
            }
        }

        self.order
            .iter()
            .enumerate()
            .filter(|(position, _)| selected[*position])
            .map(|(_, target)| &self.computations[target])
            .collect()
    }

    /// Number of declared computations.
    pub fn len(&self) -> usize {
        self.computations.len()
    }

    /// Whether no computations are declared.
    pub fn is_empty(&self) -> bool {
        self.computations.is_empty()
    }
}

impl std::fmt::Debug for ComputationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputationGraph")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
