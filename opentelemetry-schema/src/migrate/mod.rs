//! Attribute level migration primitives.
//!
//! Every primitive here knows how to run in both directions. The direction is
//! picked per call with a [`StateSelector`], so one value can both upgrade
//! and downgrade telemetry.
mod attributes;
mod conditional;
mod multi_conditional;
mod signal_name;

pub use attributes::AttributeChangeSet;
pub use conditional::ConditionalAttributeSet;
pub use multi_conditional::MultiConditionalAttributeSet;
pub use signal_name::SignalNameChange;

use std::fmt;

/// The direction a migration runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateSelector {
    /// Move telemetry forward to the newer schema version.
    Apply,
    /// Move telemetry back to the older schema version.
    Rollback,
}

impl fmt::Display for StateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSelector::Apply => f.write_str("apply"),
            StateSelector::Rollback => f.write_str("rollback"),
        }
    }
}
