use std::collections::{HashMap, HashSet};

use opentelemetry_proto::tonic::common::v1::KeyValue;

use crate::error::{MigrationError, MigrationResult};
use crate::migrate::{AttributeChangeSet, StateSelector};

/// An [`AttributeChangeSet`] gated on several named discriminators at once,
/// for example on both the name of a span event and the name of its span.
///
/// Each discriminator key has its own set of permitted values. A key with an
/// empty set accepts any value, and a gate without keys always runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiConditionalAttributeSet {
    on: HashMap<String, HashSet<String>>,
    attributes: AttributeChangeSet,
}

impl MultiConditionalAttributeSet {
    /// Creates a gated change set from `(discriminator key, permitted
    /// values)` pairs.
    pub fn new<I, K, V, M>(attributes: AttributeChangeSet, matches: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = M>,
        M: Into<String>,
    {
        MultiConditionalAttributeSet {
            on: matches
                .into_iter()
                .map(|(key, values)| (key.into(), values.into_iter().map(Into::into).collect()))
                .collect(),
            attributes,
        }
    }

    /// Runs the wrapped change set against `attributes` if `discriminators`
    /// match the gate.
    ///
    /// `discriminators` must name exactly the keys the gate was built with,
    /// otherwise an error is returned and nothing is changed.
    pub fn migrate(
        &self,
        selector: StateSelector,
        attributes: &mut [KeyValue],
        discriminators: &[(&str, &str)],
    ) -> MigrationResult {
        if self.check(discriminators)? {
            self.attributes.migrate(selector, attributes)
        } else {
            Ok(())
        }
    }

    /// Returns whether the change set should run for `discriminators`.
    pub fn check(&self, discriminators: &[(&str, &str)]) -> MigrationResult<bool> {
        if self.on.is_empty() {
            return Ok(true);
        }
        if self.on.len() != discriminators.len() {
            return Err(MigrationError::DiscriminatorCount {
                expected: self.on.len(),
                actual: discriminators.len(),
            });
        }
        if let Some((key, _)) = discriminators
            .iter()
            .find(|(key, _)| !self.on.contains_key(*key))
        {
            return Err(MigrationError::UnknownDiscriminator {
                key: key.to_string(),
            });
        }

        let mut matched = true;
        for (key, permitted) in &self.on {
            match discriminators.iter().find(|(k, _)| *k == key.as_str()) {
                None => {
                    return Err(MigrationError::MissingDiscriminator { key: key.clone() });
                }
                Some((_, value)) => {
                    if !permitted.is_empty() && !permitted.contains(*value) {
                        matched = false;
                    }
                }
            }
        }
        Ok(matched)
    }
}
