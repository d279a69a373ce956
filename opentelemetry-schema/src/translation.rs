//! Migration across several schema versions.
//!
//! A [`Translation`] holds one [`Revision`] per schema version, oldest first.
//! Each revision carries the changelists that lead to it from the version
//! before. Jumping across many versions is the composition of the single
//! version steps: upgrades apply revisions oldest to newest, downgrades roll
//! them back newest to oldest.
use opentelemetry::otel_debug;
use opentelemetry_proto::tonic::logs::v1::LogRecord;
use opentelemetry_proto::tonic::metrics::v1::Metric;
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::Span;

use crate::changelist::ChangeList;
use crate::error::{MigrationError, MigrationResult};
use crate::migrate::StateSelector;
use crate::signal::{try_for_each_data_point, Attributed, Signal};

/// The changes that lead to one schema version from the version before it.
///
/// Within a revision, `all` runs before the signal specific changelists on
/// apply, and after them on rollback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revision {
    version: String,
    all: ChangeList,
    resources: ChangeList,
    spans: ChangeList,
    span_events: ChangeList,
    metrics: ChangeList,
    logs: ChangeList,
}

impl Revision {
    /// Creates a revision for `version` without any changes.
    pub fn new(version: impl Into<String>) -> Self {
        Revision {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Creates a [`RevisionBuilder`] for `version`.
    pub fn builder(version: impl Into<String>) -> RevisionBuilder {
        RevisionBuilder {
            revision: Revision::new(version),
        }
    }

    /// The schema version this revision leads to.
    pub fn version(&self) -> &str {
        &self.version
    }

    fn migrate_span(&self, selector: StateSelector, span: &mut Span) -> MigrationResult {
        match selector {
            StateSelector::Apply => {
                self.all.apply(&mut *span)?;
                for event in span.events.iter_mut() {
                    self.all.apply(event)?;
                }
                self.spans.apply(&mut *span)?;
                self.span_events.apply(span)
            }
            StateSelector::Rollback => {
                self.span_events.rollback(&mut *span)?;
                self.spans.rollback(&mut *span)?;
                for event in span.events.iter_mut() {
                    self.all.rollback(event)?;
                }
                self.all.rollback(span)
            }
        }
    }

    fn migrate_metric(&self, selector: StateSelector, metric: &mut Metric) -> MigrationResult {
        match selector {
            StateSelector::Apply => {
                try_for_each_data_point(&mut metric.data, |data_point| {
                    self.all.apply(Signal::Attributed(data_point))
                })?;
                self.metrics.apply(metric)
            }
            StateSelector::Rollback => {
                self.metrics.rollback(&mut *metric)?;
                try_for_each_data_point(&mut metric.data, |data_point| {
                    self.all.rollback(Signal::Attributed(data_point))
                })
            }
        }
    }

    fn migrate_attributed(
        &self,
        selector: StateSelector,
        specific: &ChangeList,
        signal: &mut dyn Attributed,
    ) -> MigrationResult {
        let (first, second) = match selector {
            StateSelector::Apply => (&self.all, specific),
            StateSelector::Rollback => (specific, &self.all),
        };
        first.migrate(selector, Signal::Attributed(&mut *signal))?;
        second.migrate(selector, Signal::Attributed(signal))
    }
}

/// Builder for [`Revision`].
#[derive(Clone, Debug)]
pub struct RevisionBuilder {
    revision: Revision,
}

impl RevisionBuilder {
    /// Changes applied to every attribute bearing entity: resources, spans,
    /// span events, metric data points and log records.
    pub fn with_all(mut self, changes: ChangeList) -> Self {
        self.revision.all = changes;
        self
    }

    /// Changes applied to resources.
    pub fn with_resources(mut self, changes: ChangeList) -> Self {
        self.revision.resources = changes;
        self
    }

    /// Changes applied to spans.
    pub fn with_spans(mut self, changes: ChangeList) -> Self {
        self.revision.spans = changes;
        self
    }

    /// Changes applied to the events of spans.
    pub fn with_span_events(mut self, changes: ChangeList) -> Self {
        self.revision.span_events = changes;
        self
    }

    /// Changes applied to metrics.
    pub fn with_metrics(mut self, changes: ChangeList) -> Self {
        self.revision.metrics = changes;
        self
    }

    /// Changes applied to log records.
    pub fn with_logs(mut self, changes: ChangeList) -> Self {
        self.revision.logs = changes;
        self
    }

    /// Builds the revision.
    pub fn build(self) -> Revision {
        self.revision
    }
}

/// An ordered history of schema versions able to move signals between any
/// two of them.
///
/// The first revision is the oldest known version; its changes are never
/// run, since nothing leads to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Translation {
    revisions: Vec<Revision>,
}

impl Translation {
    /// Creates a translation from revisions ordered oldest first.
    pub fn new(revisions: Vec<Revision>) -> Self {
        Translation { revisions }
    }

    /// Known versions, oldest first.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.revisions.iter().map(Revision::version)
    }

    /// Returns `true` if `version` is known to this translation.
    pub fn supports_version(&self, version: &str) -> bool {
        self.position(version).is_ok()
    }

    /// Moves `span`, and its events, from schema version `from` to `to`.
    pub fn migrate_span(&self, span: &mut Span, from: &str, to: &str) -> MigrationResult {
        self.migrate_with(from, to, |revision, selector| {
            revision.migrate_span(selector, span)
        })
    }

    /// Moves `metric`, and its data points, from schema version `from` to
    /// `to`.
    pub fn migrate_metric(&self, metric: &mut Metric, from: &str, to: &str) -> MigrationResult {
        self.migrate_with(from, to, |revision, selector| {
            revision.migrate_metric(selector, metric)
        })
    }

    /// Moves `resource` from schema version `from` to `to`.
    pub fn migrate_resource(
        &self,
        resource: &mut Resource,
        from: &str,
        to: &str,
    ) -> MigrationResult {
        self.migrate_with(from, to, |revision, selector| {
            revision.migrate_attributed(selector, &revision.resources, &mut *resource)
        })
    }

    /// Moves `log` from schema version `from` to `to`.
    pub fn migrate_log(&self, log: &mut LogRecord, from: &str, to: &str) -> MigrationResult {
        self.migrate_with(from, to, |revision, selector| {
            revision.migrate_attributed(selector, &revision.logs, &mut *log)
        })
    }

    fn position(&self, version: &str) -> MigrationResult<usize> {
        self.revisions
            .iter()
            .position(|revision| revision.version == version)
            .ok_or_else(|| MigrationError::UnknownVersion {
                version: version.to_string(),
            })
    }

    fn migrate_with<F>(&self, from: &str, to: &str, mut f: F) -> MigrationResult
    where
        F: FnMut(&Revision, StateSelector) -> MigrationResult,
    {
        let start = self.position(from)?;
        let end = self.position(to)?;
        otel_debug!(
            name: "Translation.Migrate",
            from = from,
            to = to,
            revisions = start.abs_diff(end)
        );
        if start <= end {
            self.revisions[start + 1..=end]
                .iter()
                .try_for_each(|revision| f(revision, StateSelector::Apply))
        } else {
            self.revisions[end + 1..=start]
                .iter()
                .rev()
                .try_for_each(|revision| f(revision, StateSelector::Rollback))
        }
    }
}
