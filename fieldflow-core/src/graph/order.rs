//! Evaluation Order
//!
//! Computes a total order over a set of declarations: every computation whose
//! target is a source of another appears before it. This is a depth-first
//! topological sort over the depends-on relation, emitting each node after
//! all of its in-graph dependencies (post-order).
//!
//! # Determinism
//!
//! A topological order is only partial; ties between unrelated computations
//! are broken by iterating roots in declaration order and sources in declared
//! argument order. The same declarations always produce the same order.
//!
//! # Cycle Detection
//!
//! Cycle detection is integral to the traversal: reaching a node that is
//! already on the active path is a back-edge. The error reconstructs the full
//! member list from the path rather than merely reporting that a cycle
//! exists, so the contradiction is diagnosable from the message alone.
//!
//! The sort works on a borrowed snapshot of (target, sources) pairs, keeping
//! the algorithm independent of how the graph stores its computations.

use std::collections::HashMap;

use crate::error::CyclicDependency;

/// One declaration as the sorter sees it: a target and its source list.
pub(crate) type Entry<'a> = (&'a str, &'a [String]);

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    /// On the active traversal path; reaching it again means a cycle.
    OnPath,
    Done,
}

/// Produce the total evaluation order for `entries`, or the first cycle
/// found.
///
/// Sources with no matching entry are exogenous inputs and contribute no
/// edge.
pub(crate) fn evaluation_order(entries: &[Entry<'_>]) -> Result<Vec<String>, CyclicDependency> {
    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, (target, _))| (*target, i))
        .collect();

    let mut sorter = Sorter {
        entries,
        index,
        marks: vec![Mark::Unvisited; entries.len()],
        path: Vec::new(),
        order: Vec::with_capacity(entries.len()),
    };

    for i in 0..entries.len() {
        sorter.visit(i)?;
    }
    Ok(sorter.order)
}

struct Sorter<'a, 'b> {
    entries: &'b [Entry<'a>],
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    path: Vec<usize>,
    order: Vec<String>,
}

impl Sorter<'_, '_> {
    fn visit(&mut self, i: usize) -> Result<(), CyclicDependency> {
        match self.marks[i] {
            Mark::Done => return Ok(()),
            Mark::OnPath => return Err(self.cycle_through(i)),
            Mark::Unvisited => {}
        }

        self.marks[i] = Mark::OnPath;
        self.path.push(i);
        for source in self.entries[i].1 {
            if let Some(&j) = self.index.get(source.as_str()) {
                self.visit(j)?;
            }
        }
        self.path.pop();
        self.marks[i] = Mark::Done;

        self.order.push(self.entries[i].0.to_owned());
        Ok(())
    }

    /// Rebuild the cycle that runs through node `i` from the active path.
    fn cycle_through(&self, i: usize) -> CyclicDependency {
        // An OnPath node is always somewhere on the active path.
        let start = self.path.iter().position(|&k| k == i).unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|&k| self.entries[k].0.to_owned())
            .collect();
        cycle.push(self.entries[i].0.to_owned());
        CyclicDependency { cycle }
    }
}
