//! Ordered migration steps between two adjacent schema versions.
use opentelemetry::otel_debug;

use crate::error::{MigrationError, MigrationResult};
use crate::migrate::{AttributeChangeSet, StateSelector};
use crate::operator::{
    MetricDataPointAttributeOperator, MetricOperator, MetricSignalNameChange,
    SpanConditionalAttributeOperator, SpanEventConditionalAttributeOperator,
    SpanEventSignalNameChange, SpanOperator,
};
use crate::signal::Signal;

/// A single migration step held by a [`ChangeList`].
///
/// Each variant declares which signals it can act on: span operators need a
/// [`Signal::Span`], metric operators a [`Signal::Metric`] and a bare
/// attribute change set any signal with attributes of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Migrator {
    /// Renames the attributes of the signal itself.
    Attributes(AttributeChangeSet),
    /// Acts on spans and their events.
    Span(SpanOperator),
    /// Acts on metrics and their data points.
    Metric(MetricOperator),
}

impl Migrator {
    /// Type name of the migration step, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Migrator::Attributes(_) => "AttributeChangeSet",
            Migrator::Span(op) => op.name(),
            Migrator::Metric(op) => op.name(),
        }
    }

    fn migrate(&self, selector: StateSelector, signal: &mut Signal<'_>) -> MigrationResult {
        match (self, signal) {
            (Migrator::Span(op), Signal::Span(span)) => op.migrate(selector, span),
            (Migrator::Metric(op), Signal::Metric(metric)) => op.migrate(selector, metric),
            (Migrator::Attributes(changes), Signal::Span(span)) => {
                changes.migrate(selector, &mut span.attributes)
            }
            (Migrator::Attributes(changes), Signal::Attributed(attributed)) => {
                changes.migrate(selector, attributed.attributes_mut())
            }
            (Migrator::Attributes(_), Signal::Metric(_)) => {
                Err(MigrationError::UnsupportedSignal { signal: "Metric" })
            }
            (Migrator::Span(op), signal) => Err(MigrationError::SignalMismatch {
                migrator: op.name(),
                signal: signal.signal_type(),
            }),
            (Migrator::Metric(op), signal) => Err(MigrationError::SignalMismatch {
                migrator: op.name(),
                signal: signal.signal_type(),
            }),
        }
    }
}

impl From<AttributeChangeSet> for Migrator {
    fn from(changes: AttributeChangeSet) -> Self {
        Migrator::Attributes(changes)
    }
}

impl From<SpanOperator> for Migrator {
    fn from(op: SpanOperator) -> Self {
        Migrator::Span(op)
    }
}

impl From<MetricOperator> for Migrator {
    fn from(op: MetricOperator) -> Self {
        Migrator::Metric(op)
    }
}

macro_rules! impl_from_operator {
    ($variant:ident($operator:ty) => $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Migrator {
                fn from(op: $ty) -> Self {
                    Migrator::$variant(<$operator>::from(op))
                }
            }
        )+
    };
}

impl_from_operator!(Span(SpanOperator) =>
    SpanConditionalAttributeOperator,
    SpanEventConditionalAttributeOperator,
    SpanEventSignalNameChange,
);
impl_from_operator!(Metric(MetricOperator) =>
    MetricDataPointAttributeOperator,
    MetricSignalNameChange,
);

/// An ordered list of migration steps, the difference between two adjacent
/// schema versions for one signal category.
///
/// [`apply`](Self::apply) runs the steps first to last and
/// [`rollback`](Self::rollback) runs their inverses last to first, so that a
/// rollback undoes an apply step by step.
///
/// Running a changelist is not transactional. The first failing step aborts
/// the call and every step that ran before it stays applied to the signal.
/// Callers that need all or nothing should migrate a copy of the signal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeList {
    migrators: Vec<Migrator>,
}

impl ChangeList {
    /// Creates a changelist running `migrators` in the given order.
    pub fn new(migrators: Vec<Migrator>) -> Self {
        ChangeList { migrators }
    }

    /// Creates a [`ChangeListBuilder`].
    pub fn builder() -> ChangeListBuilder {
        ChangeListBuilder::default()
    }

    /// The migration steps, in apply order.
    pub fn migrators(&self) -> &[Migrator] {
        &self.migrators
    }

    /// Number of migration steps.
    pub fn len(&self) -> usize {
        self.migrators.len()
    }

    /// Returns `true` if there is nothing to migrate.
    pub fn is_empty(&self) -> bool {
        self.migrators.is_empty()
    }

    /// Runs every step against `signal` in the direction picked by
    /// `selector`.
    pub fn migrate<'a>(
        &self,
        selector: StateSelector,
        signal: impl Into<Signal<'a>>,
    ) -> MigrationResult {
        let mut signal = signal.into();
        otel_debug!(
            name: "ChangeList.Migrate",
            direction = selector.to_string(),
            migrators = self.migrators.len(),
            signal_type = signal.signal_type()
        );
        match selector {
            StateSelector::Apply => self
                .migrators
                .iter()
                .try_for_each(|migrator| migrator.migrate(selector, &mut signal)),
            StateSelector::Rollback => self
                .migrators
                .iter()
                .rev()
                .try_for_each(|migrator| migrator.migrate(selector, &mut signal)),
        }
    }

    /// Upgrades `signal` to the newer schema version.
    pub fn apply<'a>(&self, signal: impl Into<Signal<'a>>) -> MigrationResult {
        self.migrate(StateSelector::Apply, signal)
    }

    /// Downgrades `signal` to the older schema version.
    pub fn rollback<'a>(&self, signal: impl Into<Signal<'a>>) -> MigrationResult {
        self.migrate(StateSelector::Rollback, signal)
    }
}

impl FromIterator<Migrator> for ChangeList {
    fn from_iter<T: IntoIterator<Item = Migrator>>(iter: T) -> Self {
        ChangeList::new(iter.into_iter().collect())
    }
}

/// Builder for [`ChangeList`].
#[derive(Clone, Debug, Default)]
pub struct ChangeListBuilder {
    migrators: Vec<Migrator>,
}

impl ChangeListBuilder {
    /// Appends a migration step.
    pub fn with_migrator(mut self, migrator: impl Into<Migrator>) -> Self {
        self.migrators.push(migrator.into());
        self
    }

    /// Builds the changelist.
    pub fn build(self) -> ChangeList {
        ChangeList::new(self.migrators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::{ConditionalAttributeSet, MultiConditionalAttributeSet, SignalNameChange};
    use crate::operator::{EVENT_NAME_KEY, SPAN_NAME_KEY};
    use crate::testing::{attrs, histogram, keys, span_with_events};
    use opentelemetry_proto::tonic::logs::v1::LogRecord;
    use opentelemetry_proto::tonic::resource::v1::Resource;
    use opentelemetry_proto::tonic::trace::v1::Span;

    fn rename(from: &str, to: &str) -> AttributeChangeSet {
        AttributeChangeSet::new([(from, to)])
    }

    fn span_rename(on: &str, from: &str, to: &str) -> SpanConditionalAttributeOperator {
        SpanConditionalAttributeOperator::new(ConditionalAttributeSet::new(rename(from, to), [on]))
    }

    #[test]
    fn apply_runs_in_order_rollback_in_reverse() {
        let changes = ChangeList::builder()
            .with_migrator(rename("a", "b"))
            .with_migrator(rename("b", "c"))
            .build();
        let mut resource = Resource {
            attributes: attrs(&[("a", "1")]),
            ..Default::default()
        };

        changes.apply(&mut resource).unwrap();
        assert_eq!(resource.attributes, attrs(&[("c", "1")]));

        changes.rollback(&mut resource).unwrap();
        assert_eq!(resource.attributes, attrs(&[("a", "1")]));
    }

    #[test]
    fn declared_order_matters() {
        let forward: ChangeList = [rename("a", "b"), rename("b", "c")]
            .into_iter()
            .map(Migrator::from)
            .collect();
        let swapped: ChangeList = [rename("b", "c"), rename("a", "b")]
            .into_iter()
            .map(Migrator::from)
            .collect();

        let mut first = LogRecord {
            attributes: attrs(&[("a", "1")]),
            ..Default::default()
        };
        let mut second = first.clone();
        forward.apply(&mut first).unwrap();
        swapped.apply(&mut second).unwrap();

        assert_eq!(keys(&first.attributes), ["c"]);
        assert_eq!(keys(&second.attributes), ["b"]);
    }

    #[test]
    fn span_operator_gated_on_span_name() {
        let changes = ChangeList::builder()
            .with_migrator(span_rename("http.server", "http.method", "http.request.method"))
            .build();

        let mut server = Span {
            name: "http.server".into(),
            attributes: attrs(&[("http.method", "GET")]),
            ..Default::default()
        };
        changes.apply(&mut server).unwrap();
        assert_eq!(keys(&server.attributes), ["http.request.method"]);

        let mut client = Span {
            name: "grpc.client".into(),
            attributes: attrs(&[("http.method", "GET")]),
            ..Default::default()
        };
        let before = client.clone();
        changes.apply(&mut client).unwrap();
        assert_eq!(client, before);
    }

    #[test]
    fn span_changelist_mixes_span_and_attribute_steps() {
        let changes = ChangeList::builder()
            .with_migrator(rename("net.peer.name", "server.address"))
            .with_migrator(SpanEventConditionalAttributeOperator::new(
                MultiConditionalAttributeSet::new(
                    rename("retry.count", "retry.attempt"),
                    [(EVENT_NAME_KEY, ["retry"]), (SPAN_NAME_KEY, ["fetch"])],
                ),
            ))
            .with_migrator(SpanEventSignalNameChange::new(SignalNameChange::new([(
                "retry",
                "http.retry",
            )])))
            .build();
        let mut span = span_with_events("fetch", &["connect", "retry", "done"], "retry.count");
        span.attributes = attrs(&[("net.peer.name", "example.com")]);
        let original = span.clone();

        changes.apply(&mut span).unwrap();
        assert_eq!(keys(&span.attributes), ["server.address"]);
        assert_eq!(span.events[1].name, "http.retry");
        assert_eq!(keys(&span.events[1].attributes), ["retry.attempt"]);
        assert_eq!(keys(&span.events[0].attributes), ["retry.count"]);

        changes.rollback(&mut span).unwrap();
        assert_eq!(span, original);
    }

    #[test]
    fn span_operator_rejects_metric() {
        let changes = ChangeList::builder()
            .with_migrator(span_rename("http.server", "http.method", "http.request.method"))
            .build();
        let mut metric = histogram("http.server", vec![attrs(&[("http.method", "GET")])]);
        let before = metric.clone();

        let err = changes.apply(&mut metric).unwrap_err();
        assert_eq!(
            err,
            MigrationError::SignalMismatch {
                migrator: "SpanConditionalAttributeOperator",
                signal: "Metric",
            }
        );
        assert!(err.to_string().contains("SpanConditionalAttributeOperator"));
        assert!(err.to_string().contains("Metric"));
        assert_eq!(metric, before);
    }

    #[test]
    fn metric_operator_rejects_span() {
        let changes = ChangeList::builder()
            .with_migrator(MetricSignalNameChange::new(SignalNameChange::new([("a", "b")])))
            .build();
        let mut span = Span::default();

        assert_eq!(
            changes.apply(&mut span),
            Err(MigrationError::SignalMismatch {
                migrator: "MetricSignalNameChange",
                signal: "Span",
            })
        );
    }

    #[test]
    fn attribute_change_set_rejects_metric() {
        let changes = ChangeList::builder().with_migrator(rename("a", "b")).build();
        let mut metric = histogram("m", vec![attrs(&[("a", "1")])]);

        assert_eq!(
            changes.apply(&mut metric),
            Err(MigrationError::UnsupportedSignal { signal: "Metric" })
        );
    }

    #[test]
    fn failure_keeps_earlier_steps() {
        let changes = ChangeList::builder()
            .with_migrator(rename("a", "x"))
            .with_migrator(span_rename("fetch", "b", "y"))
            .build();
        let mut resource = Resource {
            attributes: attrs(&[("a", "1"), ("b", "2")]),
            ..Default::default()
        };

        let err = changes.apply(&mut resource).unwrap_err();
        assert_eq!(
            err,
            MigrationError::SignalMismatch {
                migrator: "SpanConditionalAttributeOperator",
                signal: "Resource",
            }
        );
        assert_eq!(keys(&resource.attributes), ["x", "b"]);
    }

    #[test]
    fn rollback_failure_keeps_later_steps() {
        let changes = ChangeList::builder()
            .with_migrator(rename("a", "x"))
            .with_migrator(rename("b", "y"))
            .build();
        let mut resource = Resource {
            attributes: attrs(&[("y", "1"), ("x", "2"), ("a", "3")]),
            ..Default::default()
        };

        assert_eq!(
            changes.rollback(&mut resource),
            Err(MigrationError::AttributeConflict { key: "a".into() })
        );
        assert_eq!(keys(&resource.attributes), ["b", "x", "a"]);
    }

    #[test]
    fn empty_changelist_accepts_anything() {
        let changes = ChangeList::default();
        assert!(changes.is_empty());

        let mut metric = histogram("m", vec![]);
        changes.apply(&mut metric).unwrap();
        changes.rollback(&mut Span::default()).unwrap();
    }

    #[test]
    fn changelist_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeList>();
        assert_send_sync::<Migrator>();

        let changes = ChangeList::builder().with_migrator(rename("a", "b")).build();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut resource = Resource {
                        attributes: attrs(&[("a", "1")]),
                        ..Default::default()
                    };
                    changes.apply(&mut resource).unwrap();
                    assert_eq!(keys(&resource.attributes), ["b"]);
                });
            }
        });
    }

    #[test]
    fn migrator_names() {
        let changes = ChangeList::builder()
            .with_migrator(rename("a", "b"))
            .with_migrator(span_rename("s", "a", "b"))
            .with_migrator(MetricDataPointAttributeOperator::new(
                ConditionalAttributeSet::unconditional(rename("a", "b")),
            ))
            .build();
        let names: Vec<_> = changes.migrators().iter().map(Migrator::name).collect();
        assert_eq!(
            names,
            [
                "AttributeChangeSet",
                "SpanConditionalAttributeOperator",
                "MetricDataPointAttributeOperator"
            ]
        );
        assert_eq!(changes.len(), 3);
    }
}
