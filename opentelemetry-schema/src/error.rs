//! Errors returned while migrating telemetry between schema versions.
use thiserror::Error;

/// A specialized `Result` type for migration operations.
pub type MigrationResult<T = ()> = Result<T, MigrationError>;

/// Errors that can occur while a [`ChangeList`] or one of its migrators runs.
///
/// None of these are recovered from inside the engine. Migrators that ran
/// before the failing one keep their effect on the signal.
///
/// [`ChangeList`]: crate::ChangeList
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MigrationError {
    /// A migrator built for one signal category was run against another.
    #[error("{migrator} can't act on {signal}")]
    SignalMismatch {
        /// Name of the migrator type.
        migrator: &'static str,
        /// Name of the signal type that was received.
        signal: &'static str,
    },

    /// A bare attribute change set was run against a signal that carries no
    /// attributes of its own.
    #[error("unsupported signal type {signal} for AttributeChangeSet")]
    UnsupportedSignal {
        /// Name of the signal type that was received.
        signal: &'static str,
    },

    /// A change kind is not known for the signal category of the changelist
    /// being built.
    #[error("unsupported migrator type {migrator} for {signal_category}")]
    UnsupportedMigrator {
        /// Name of the requested change kind.
        migrator: String,
        /// Signal category of the changelist.
        signal_category: &'static str,
    },

    /// A rename would produce a key that is already present.
    #[error("value {key:?} already exists")]
    AttributeConflict {
        /// The conflicting attribute key.
        key: String,
    },

    /// A keyed gate received a different number of discriminators than it
    /// is defined over.
    #[error("passed in wrong number of keys to check. Expected {expected}, got {actual}")]
    DiscriminatorCount {
        /// Number of discriminator keys the gate is defined over.
        expected: usize,
        /// Number of discriminators supplied.
        actual: usize,
    },

    /// A keyed gate was given a discriminator it is not defined over.
    #[error("discriminator {key:?} is not known to the MultiConditionalAttributeSet")]
    UnknownDiscriminator {
        /// The discriminator key.
        key: String,
    },

    /// A keyed gate was called without one of the discriminators it is
    /// defined over.
    #[error("discriminator {key:?} is missing")]
    MissingDiscriminator {
        /// The discriminator key.
        key: String,
    },

    /// A translation was asked for a schema version it does not hold.
    #[error("unknown schema version {version:?}")]
    UnknownVersion {
        /// The requested version.
        version: String,
    },

    /// The declarative change list configuration could not be read.
    #[error("invalid change list configuration: {0}")]
    Config(String),
}
