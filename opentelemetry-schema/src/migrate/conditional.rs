use std::collections::HashSet;

use opentelemetry_proto::tonic::common::v1::KeyValue;

use crate::error::MigrationResult;
use crate::migrate::{AttributeChangeSet, StateSelector};

/// An [`AttributeChangeSet`] that only runs for selected discriminator
/// values, for example for spans with a given name.
///
/// Every value passed to [`migrate`](Self::migrate) is checked against one
/// shared set. A set created without values matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionalAttributeSet {
    on: HashSet<String>,
    attributes: AttributeChangeSet,
}

impl ConditionalAttributeSet {
    /// Creates a conditional change set that runs `attributes` when every
    /// checked value is one of `matches`.
    pub fn new<I, M>(attributes: AttributeChangeSet, matches: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        ConditionalAttributeSet {
            on: matches.into_iter().map(Into::into).collect(),
            attributes,
        }
    }

    /// Creates a conditional change set that always runs.
    pub fn unconditional(attributes: AttributeChangeSet) -> Self {
        ConditionalAttributeSet {
            on: HashSet::new(),
            attributes,
        }
    }

    /// Runs the wrapped change set against `attributes` if `values` match.
    ///
    /// A mismatch is not an error: the container is left as it is.
    pub fn migrate(
        &self,
        selector: StateSelector,
        attributes: &mut [KeyValue],
        values: &[&str],
    ) -> MigrationResult {
        if self.check(values) {
            self.attributes.migrate(selector, attributes)
        } else {
            Ok(())
        }
    }

    /// Returns `true` when the change set should run for `values`.
    ///
    /// An empty value list matches any set.
    pub fn check(&self, values: &[&str]) -> bool {
        self.on.is_empty() || values.iter().all(|value| self.on.contains(*value))
    }
}
