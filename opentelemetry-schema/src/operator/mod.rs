//! Operators adapt the attribute level primitives of [`crate::migrate`] to a
//! concrete signal, supplying the discriminator values each primitive is
//! gated on.
mod metric;
mod span;

pub use metric::{MetricDataPointAttributeOperator, MetricSignalNameChange};
pub use span::{
    SpanConditionalAttributeOperator, SpanEventConditionalAttributeOperator,
    SpanEventSignalNameChange, EVENT_NAME_KEY, SPAN_NAME_KEY,
};

use opentelemetry_proto::tonic::metrics::v1::Metric;
use opentelemetry_proto::tonic::trace::v1::Span;

use crate::error::MigrationResult;
use crate::migrate::StateSelector;

/// A migration step that can only act on spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpanOperator {
    /// See [`SpanConditionalAttributeOperator`].
    ConditionalAttributes(SpanConditionalAttributeOperator),
    /// See [`SpanEventConditionalAttributeOperator`].
    EventConditionalAttributes(SpanEventConditionalAttributeOperator),
    /// See [`SpanEventSignalNameChange`].
    EventNameChange(SpanEventSignalNameChange),
}

impl SpanOperator {
    /// Runs the operator against `span`.
    pub fn migrate(&self, selector: StateSelector, span: &mut Span) -> MigrationResult {
        match self {
            SpanOperator::ConditionalAttributes(op) => op.migrate(selector, span),
            SpanOperator::EventConditionalAttributes(op) => op.migrate(selector, span),
            SpanOperator::EventNameChange(op) => op.migrate(selector, span),
        }
    }

    /// Type name of the wrapped operator.
    pub fn name(&self) -> &'static str {
        match self {
            SpanOperator::ConditionalAttributes(_) => "SpanConditionalAttributeOperator",
            SpanOperator::EventConditionalAttributes(_) => "SpanEventConditionalAttributeOperator",
            SpanOperator::EventNameChange(_) => "SpanEventSignalNameChange",
        }
    }
}

impl From<SpanConditionalAttributeOperator> for SpanOperator {
    fn from(op: SpanConditionalAttributeOperator) -> Self {
        SpanOperator::ConditionalAttributes(op)
    }
}

impl From<SpanEventConditionalAttributeOperator> for SpanOperator {
    fn from(op: SpanEventConditionalAttributeOperator) -> Self {
        SpanOperator::EventConditionalAttributes(op)
    }
}

impl From<SpanEventSignalNameChange> for SpanOperator {
    fn from(op: SpanEventSignalNameChange) -> Self {
        SpanOperator::EventNameChange(op)
    }
}

/// A migration step that can only act on metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricOperator {
    /// See [`MetricDataPointAttributeOperator`].
    DataPointAttributes(MetricDataPointAttributeOperator),
    /// See [`MetricSignalNameChange`].
    NameChange(MetricSignalNameChange),
}

impl MetricOperator {
    /// Runs the operator against `metric`.
    pub fn migrate(&self, selector: StateSelector, metric: &mut Metric) -> MigrationResult {
        match self {
            MetricOperator::DataPointAttributes(op) => op.migrate(selector, metric),
            MetricOperator::NameChange(op) => op.migrate(selector, metric),
        }
    }

    /// Type name of the wrapped operator.
    pub fn name(&self) -> &'static str {
        match self {
            MetricOperator::DataPointAttributes(_) => "MetricDataPointAttributeOperator",
            MetricOperator::NameChange(_) => "MetricSignalNameChange",
        }
    }
}

impl From<MetricDataPointAttributeOperator> for MetricOperator {
    fn from(op: MetricDataPointAttributeOperator) -> Self {
        MetricOperator::DataPointAttributes(op)
    }
}

impl From<MetricSignalNameChange> for MetricOperator {
    fn from(op: MetricSignalNameChange) -> Self {
        MetricOperator::NameChange(op)
    }
}
