//! Computation Declarations
//!
//! A [`Computation`] is a single derived-field declaration: the target
//! property it writes, the ordered source properties it reads, and the pure
//! transform from source values to the target value.
//!
//! Sources are declared explicitly, in the exact order the transform expects
//! its arguments. They are the only dependency information a graph ever
//! sees; there is no separate dependency declaration to fall out of sync.
//!
//! A computation knows nothing about other computations. Sequencing and
//! triggering live in [`graph`](crate::graph).

use std::collections::HashSet;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{DeclarationError, TransformError};
use crate::record::{Record, Value};

/// The transform signature: source values, positionally in declared source
/// order, to the target value.
pub type TransformFn = dyn Fn(&[Value]) -> Result<Value, TransformError> + Send + Sync;

/// A derived-field declaration.
pub struct Computation {
    target: String,
    sources: SmallVec<[String; 4]>,
    transform: Box<TransformFn>,
}

impl Computation {
    /// Declare a computation.
    ///
    /// `sources` lists the properties the transform reads, in the positional
    /// order it expects them. Declaration fails when the source list is empty
    /// (nothing could ever trigger the computation) or when it contains the
    /// target itself (the one-node cycle).
    ///
    /// The transform must be deterministic and side-effect-free; it sees the
    /// record only through its source values.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let tax = Computation::new("tax", ["subtotal"], |values| {
    ///     let subtotal = values[0].as_f64().ok_or("subtotal is not a number")?;
    ///     Ok(json!(subtotal * 0.05))
    /// })?;
    /// ```
    pub fn new<T, S, F>(target: T, sources: S, transform: F) -> Result<Self, DeclarationError>
    where
        T: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        F: Fn(&[Value]) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        let target = target.into();
        let sources: SmallVec<[String; 4]> = sources.into_iter().map(Into::into).collect();

        if sources.is_empty() {
            return Err(DeclarationError::NoSources(target));
        }
        if sources.iter().any(|s| *s == target) {
            return Err(DeclarationError::SelfDependency(target));
        }

        Ok(Self {
            target,
            sources,
            transform: Box::new(transform),
        })
    }

    /// The property this computation writes.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The properties this computation reads, in positional argument order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Whether any of this computation's sources is in the changed set.
    pub fn needs_update(&self, changed_properties: &HashSet<String>) -> bool {
        self.sources.iter().any(|s| changed_properties.contains(s))
    }

    /// Read the sources from `record`, run the transform, and write the
    /// result into the target field.
    ///
    /// Exactly one field write on success; no write on failure. A transform
    /// failure is returned unmodified. Persistence is the host's business.
    pub fn apply<R: Record + ?Sized>(&self, record: &mut R) -> Result<(), TransformError> {
        let values: SmallVec<[Value; 4]> = self.sources.iter().map(|s| record.get(s)).collect();
        let result = (self.transform)(&values)?;
        record.set(&self.target, result);
        Ok(())
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation")
            .field("target", &self.target)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MapRecord;
    use serde_json::json;

    fn first_initial() -> Computation {
        Computation::new("first_initial", ["first_name"], |values| {
            let name = values[0].as_str().ok_or("first_name is not a string")?;
            Ok(json!(name.chars().next().map(String::from)))
        })
        .unwrap()
    }

    #[test]
    fn empty_source_list_is_rejected() {
        let result = Computation::new("total", Vec::<String>::new(), |_| Ok(Value::Null));
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::NoSources("total".into())
        );
    }

    #[test]
    fn self_dependency_is_rejected() {
        let result = Computation::new("total", ["subtotal", "total"], |_| Ok(Value::Null));
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::SelfDependency("total".into())
        );
    }

    #[test]
    fn needs_update_checks_source_intersection() {
        let computation = first_initial();

        let changed = HashSet::from(["first_name".into(), "created_at".into()]);
        assert!(computation.needs_update(&changed));

        let unrelated = HashSet::from(["last_name".into()]);
        assert!(!computation.needs_update(&unrelated));
        assert!(!computation.needs_update(&HashSet::new()));
    }

    #[test]
    fn apply_writes_exactly_the_target() {
        let mut record: MapRecord = [("first_name", json!("George"))].into_iter().collect();
        record.commit();

        first_initial().apply(&mut record).unwrap();

        assert_eq!(record.get("first_initial"), json!("G"));
        assert_eq!(
            record.changed_properties(),
            HashSet::from(["first_initial".into()])
        );
    }

    #[test]
    fn apply_reads_sources_in_declared_order() {
        let full_name = Computation::new("full_name", ["first_name", "last_name"], |values| {
            let first = values[0].as_str().unwrap_or_default();
            let last = values[1].as_str().unwrap_or_default();
            Ok(json!(format!("{first} {last}")))
        })
        .unwrap();

        let mut record: MapRecord = [("first_name", json!("John")), ("last_name", json!("Doe"))]
            .into_iter()
            .collect();
        full_name.apply(&mut record).unwrap();
        assert_eq!(record.get("full_name"), json!("John Doe"));
    }

    #[test]
    fn transform_failure_leaves_the_target_unwritten() {
        let mut record = MapRecord::new();
        // first_name is missing, so the transform sees Null and fails.
        let err = first_initial().apply(&mut record).unwrap_err();
        assert_eq!(err.to_string(), "first_name is not a string");
        assert_eq!(record.get("first_initial"), Value::Null);
        assert!(!record.is_changed());
    }
}
