//! Dependency Graph
//!
//! This module turns a model's derived-field declarations into a dependency
//! graph and answers the two questions the engine needs:
//!
//! - in which order can all computations run so that every producer runs
//!   before its consumers, and
//! - which ordered subset must run because a given set of properties changed.
//!
//! # Overview
//!
//! Nodes are computations, keyed by the target property they write. An edge
//! runs from the computation producing a property to every computation that
//! reads it. A source property with no producing computation is an exogenous
//! input supplied from outside the graph; it is never an error.
//!
//! Declaring a cycle is rejected at insert time with the full cycle spelled
//! out, so a committed graph is always a DAG and read paths never have to
//! handle contradictions.
//!
//! # Design Decisions
//!
//! 1. Storage (target -> computation) is kept separate from the sort, which
//!    works on a borrowed snapshot of (target, sources) pairs. The map never
//!    doubles as a graph-algorithm participant.
//!
//! 2. Ordering ties between unrelated computations are broken by declaration
//!    order, so a fixed set of declarations always yields the same order.
//!
//! 3. The trigger index is precomputed at insert time. Mutation-time queries
//!    only chase index entries; they never re-derive dependency information.

mod order;
mod registry;
mod shared;

pub use registry::ComputationGraph;
pub use shared::SharedComputationGraph;
