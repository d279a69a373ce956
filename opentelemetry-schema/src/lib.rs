//! # OpenTelemetry Schema
//!
//! Moves telemetry between versions of the OpenTelemetry semantic
//! conventions. A [`ChangeList`] holds the ordered migration steps between
//! two adjacent schema versions for one signal category, and can both
//! [apply](ChangeList::apply) them to upgrade a signal and
//! [roll them back](ChangeList::rollback) to downgrade it. A [`Translation`]
//! chains changelists across many versions.
//!
//! Signals are the OTLP message types of [`opentelemetry_proto`], migrated
//! in place.
//!
//! ```rust
//! use opentelemetry_proto::tonic::trace::v1::Span;
//! use opentelemetry_schema::migrate::{AttributeChangeSet, ConditionalAttributeSet};
//! use opentelemetry_schema::operator::SpanConditionalAttributeOperator;
//! use opentelemetry_schema::ChangeList;
//!
//! let changes = ChangeList::builder()
//!     .with_migrator(SpanConditionalAttributeOperator::new(
//!         ConditionalAttributeSet::new(
//!             AttributeChangeSet::new([("http.method", "http.request.method")]),
//!             ["http.server"],
//!         ),
//!     ))
//!     .build();
//!
//! let mut span = Span {
//!     name: "http.server".to_string(),
//!     ..Default::default()
//! };
//! changes.apply(&mut span)?;
//! changes.rollback(&mut span)?;
//! # Ok::<(), opentelemetry_schema::MigrationError>(())
//! ```
//!
//! ## Crate Feature Flags
//!
//! * `config`: build changelists and translations from YAML documents. See
//!   the [`config`] module.
//! * `internal-logs`: emit debug events through `tracing` for every
//!   changelist and translation run.
//!
//! Both are enabled by default.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/open-telemetry/opentelemetry-rust/main/assets/logo.svg"
)]

pub mod changelist;
#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub mod config;
pub mod error;
pub mod migrate;
pub mod operator;
pub mod signal;
pub mod translation;

#[cfg(test)]
mod testing;

pub use changelist::{ChangeList, ChangeListBuilder, Migrator};
pub use error::{MigrationError, MigrationResult};
pub use migrate::StateSelector;
pub use signal::{Attributed, NamedSignal, Signal};
pub use translation::{Revision, RevisionBuilder, Translation};
