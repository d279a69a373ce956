use opentelemetry_proto::tonic::trace::v1::Span;

use crate::error::MigrationResult;
use crate::migrate::{
    ConditionalAttributeSet, MultiConditionalAttributeSet, SignalNameChange, StateSelector,
};

/// Discriminator key carrying the name of the span.
pub const SPAN_NAME_KEY: &str = "span.name";

/// Discriminator key carrying the name of a span event.
pub const EVENT_NAME_KEY: &str = "event.name";

/// Renames span attributes, gated on the span name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanConditionalAttributeOperator {
    migrator: ConditionalAttributeSet,
}

impl SpanConditionalAttributeOperator {
    /// Wraps `migrator`, which is checked against the span name.
    pub fn new(migrator: ConditionalAttributeSet) -> Self {
        SpanConditionalAttributeOperator { migrator }
    }

    /// Runs the wrapped change set against the attributes of `span`.
    pub fn migrate(&self, selector: StateSelector, span: &mut Span) -> MigrationResult {
        self.migrator
            .migrate(selector, &mut span.attributes, &[span.name.as_str()])
    }
}

/// Renames the attributes of span events, gated jointly on the event name
/// and the name of the span it belongs to.
///
/// Events are visited in their recorded order for both directions. The
/// first event that fails stops the walk, leaving later events untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanEventConditionalAttributeOperator {
    migrator: MultiConditionalAttributeSet,
}

impl SpanEventConditionalAttributeOperator {
    /// Wraps `migrator`, which must be keyed on [`EVENT_NAME_KEY`] and
    /// [`SPAN_NAME_KEY`], or on nothing at all.
    pub fn new(migrator: MultiConditionalAttributeSet) -> Self {
        SpanEventConditionalAttributeOperator { migrator }
    }

    /// Runs the wrapped change set against every event of `span`.
    pub fn migrate(&self, selector: StateSelector, span: &mut Span) -> MigrationResult {
        for event in span.events.iter_mut() {
            self.migrator.migrate(
                selector,
                &mut event.attributes,
                &[
                    (EVENT_NAME_KEY, event.name.as_str()),
                    (SPAN_NAME_KEY, span.name.as_str()),
                ],
            )?;
        }
        Ok(())
    }
}

/// Renames the events of a span.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanEventSignalNameChange {
    migrator: SignalNameChange,
}

impl SpanEventSignalNameChange {
    /// Wraps `migrator`, which is run against every event name.
    pub fn new(migrator: SignalNameChange) -> Self {
        SpanEventSignalNameChange { migrator }
    }

    /// Renames every matching event of `span`.
    pub fn migrate(&self, selector: StateSelector, span: &mut Span) -> MigrationResult {
        for event in span.events.iter_mut() {
            self.migrator.migrate(selector, event);
        }
        Ok(())
    }
}
