//! Fieldflow Core
//!
//! This crate lets a record type declare derived fields: each derived field's
//! value is a pure function of other fields on the same record. It maintains
//! the set of declarations as a dependency graph and implements:
//!
//! - A single global evaluation order respecting every dependency
//! - Cycle detection with diagnosable cycle reporting at declaration time
//! - Minimal, correctly ordered incremental recompute after a mutation
//! - An evaluation driver over a small host-record interface
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `computation`: a single derived-field declaration (target, sources,
//!   transform)
//! - `graph`: the dependency graph, total ordering, and trigger index
//! - `engine`: applies ordered computations to one record
//! - `record`: the capability surface a host record must provide
//! - `error`: the error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldflow_core::{Computation, ComputationGraph, MapRecord, engine};
//! use serde_json::json;
//!
//! let mut graph = ComputationGraph::new();
//! graph.insert(Computation::new("total", ["subtotal", "tax"], |values| {
//!     let sum: f64 = values.iter().filter_map(|v| v.as_f64()).sum();
//!     Ok(json!(sum))
//! })?)?;
//! graph.insert(Computation::new("tax", ["subtotal"], |values| {
//!     Ok(json!(values[0].as_f64().unwrap_or(0.0) * 0.05))
//! })?)?;
//!
//! let mut bill: MapRecord = [("subtotal", json!(100.0))].into_iter().collect();
//! engine::recompute_changed(&graph, &mut bill)?;
//! assert_eq!(bill.get("total"), json!(105.0));
//! ```
//!
//! One graph exists per record *type*, built at model-definition time and
//! shared read-only by every record instance afterwards. The host decides
//! when recomputation runs (typically right before persisting a record); the
//! crate never hooks itself into a persistence pipeline.

pub mod computation;
pub mod engine;
pub mod error;
pub mod graph;
pub mod record;

pub use computation::{Computation, TransformFn};
pub use error::{
    CyclicDependency, DeclarationError, GraphError, RecomputeError, TransformError,
};
pub use graph::{ComputationGraph, SharedComputationGraph};
pub use record::{MapRecord, Record, Value};
