//! Shared Graph Handle
//!
//! A [`ComputationGraph`] is `Send + Sync` once declaration has stabilized,
//! so hosts that finish declaring on one thread can share `&ComputationGraph`
//! freely. [`SharedComputationGraph`] covers the other case: declarations may
//! still arrive while readers are active.
//!
//! An insert is a read-modify-write over the whole evaluation order, not a
//! localized edit, so writers take a write lock across the entire rebuild.
//! Readers consequently only ever observe fully committed orders.

use parking_lot::RwLock;

use super::registry::ComputationGraph;
use crate::computation::Computation;
use crate::error::GraphError;

/// A lock-guarded [`ComputationGraph`] for concurrent declaration and reads.
#[derive(Debug, Default)]
pub struct SharedComputationGraph {
    inner: RwLock<ComputationGraph>,
}

impl SharedComputationGraph {
    /// Create an empty shared graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an already populated graph.
    pub fn from_graph(graph: ComputationGraph) -> Self {
        Self {
            inner: RwLock::new(graph),
        }
    }

    /// Declare a computation. Serialized against other inserts and against
    /// readers; the order rebuild completes before the lock is released.
    pub fn insert(&self, computation: Computation) -> Result<(), GraphError> {
        self.inner.write().insert(computation)
    }

    /// Run `f` against the current committed graph state under a read lock.
    ///
    /// Multiple readers may run concurrently. Keep `f` short; it blocks
    /// declaration for its duration.
    pub fn read<R>(&self, f: impl FnOnce(&ComputationGraph) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn declaration(target: &str, sources: &[&str]) -> Computation {
        let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        Computation::new(target, sources, |_| Ok(Value::Null)).unwrap()
    }

    #[test]
    fn readers_see_committed_state_across_threads() {
        let shared = Arc::new(SharedComputationGraph::new());
        shared.insert(declaration("tax", &["subtotal"])).unwrap();
        shared
            .insert(declaration("total", &["subtotal", "tax"]))
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let changed = HashSet::from(["subtotal".to_string()]);
                    shared.read(|graph| {
                        graph
                            .computations_triggered_by(&changed)
                            .iter()
                            .map(|c| c.target().to_owned())
                            .collect::<Vec<_>>()
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["tax", "total"]);
        }
    }

    #[test]
    fn cyclic_insert_through_the_lock_is_still_atomic() {
        let shared = SharedComputationGraph::new();
        shared.insert(declaration("a", &["b"])).unwrap();
        assert!(shared.insert(declaration("b", &["a"])).is_err());
        assert_eq!(shared.read(|graph| graph.len()), 1);
    }
}
