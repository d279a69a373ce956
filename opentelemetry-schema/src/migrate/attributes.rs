use std::collections::{HashMap, HashSet};

use opentelemetry_proto::tonic::common::v1::KeyValue;

use crate::error::{MigrationError, MigrationResult};
use crate::migrate::StateSelector;

/// A set of attribute key renames together with their inverse.
///
/// Applying the set renames every key found in the forward mapping, rolling
/// it back renames every key found in the inverse mapping. Keys that are not
/// mapped, and mapped keys that are absent, are left alone. The position of
/// each attribute in the container is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeChangeSet {
    updates: HashMap<String, String>,
    rollback: HashMap<String, String>,
}

impl AttributeChangeSet {
    /// Creates a change set from `(old key, new key)` pairs.
    ///
    /// Later pairs win when the same key is listed twice. Two sources
    /// renamed to one target can not be told apart on rollback, which then
    /// restores the later source only.
    pub fn new<I, K, V>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut updates = HashMap::new();
        let mut rollback = HashMap::new();
        for (from, to) in mappings {
            let (from, to) = (from.into(), to.into());
            rollback.insert(to.clone(), from.clone());
            updates.insert(from, to);
        }
        AttributeChangeSet { updates, rollback }
    }

    /// Returns `true` if the change set contains no renames.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Number of renames in the change set.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Renames the keys of `attributes` in the direction picked by
    /// `selector`.
    ///
    /// Fails with [`MigrationError::AttributeConflict`] when a renamed key
    /// would collide with another key of the container. `attributes` is not
    /// touched in that case.
    pub fn migrate(&self, selector: StateSelector, attributes: &mut [KeyValue]) -> MigrationResult {
        let mappings = match selector {
            StateSelector::Apply => &self.updates,
            StateSelector::Rollback => &self.rollback,
        };
        if mappings.is_empty() {
            return Ok(());
        }

        let mut renamed = HashSet::new();
        for kv in attributes.iter() {
            if let Some(to) = mappings.get(&kv.key) {
                if !renamed.insert(to.as_str()) {
                    return Err(MigrationError::AttributeConflict { key: to.clone() });
                }
            }
        }
        if renamed.is_empty() {
            return Ok(());
        }
        if let Some(kv) = attributes
            .iter()
            .find(|kv| !mappings.contains_key(&kv.key) && renamed.contains(kv.key.as_str()))
        {
            return Err(MigrationError::AttributeConflict {
                key: kv.key.clone(),
            });
        }

        for kv in attributes.iter_mut() {
            if let Some(to) = mappings.get(&kv.key) {
                kv.key.clone_from(to);
            }
        }
        Ok(())
    }

    /// Renames `attributes` forward.
    pub fn apply(&self, attributes: &mut [KeyValue]) -> MigrationResult {
        self.migrate(StateSelector::Apply, attributes)
    }

    /// Renames `attributes` back.
    pub fn rollback(&self, attributes: &mut [KeyValue]) -> MigrationResult {
        self.migrate(StateSelector::Rollback, attributes)
    }
}
