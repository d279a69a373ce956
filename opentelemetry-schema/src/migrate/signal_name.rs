use std::collections::HashMap;

use crate::migrate::StateSelector;
use crate::signal::NamedSignal;

/// Renames signals themselves, such as metrics or span events, rather than
/// their attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalNameChange {
    updates: HashMap<String, String>,
    rollback: HashMap<String, String>,
}

impl SignalNameChange {
    /// Creates a name change from `(old name, new name)` pairs.
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
        SignalNameChange { updates, rollback }
    }

    /// Renames `signal` if its current name is mapped in the direction
    /// picked by `selector`.
    pub fn migrate<S>(&self, selector: StateSelector, signal: &mut S)
    where
        S: NamedSignal + ?Sized,
    {
        let mappings = match selector {
            StateSelector::Apply => &self.updates,
            StateSelector::Rollback => &self.rollback,
        };
        if let Some(name) = mappings.get(signal.name()) {
            signal.set_name(name.clone());
        }
    }
}
