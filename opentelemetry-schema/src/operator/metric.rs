use opentelemetry_proto::tonic::metrics::v1::Metric;

use crate::error::MigrationResult;
use crate::migrate::{ConditionalAttributeSet, SignalNameChange, StateSelector};
use crate::signal::{try_for_each_data_point, Attributed};

/// Renames the attributes of every data point of a metric, gated on the
/// metric name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricDataPointAttributeOperator {
    migrator: ConditionalAttributeSet,
}

impl MetricDataPointAttributeOperator {
    /// Wraps `migrator`, which is checked against the metric name.
    pub fn new(migrator: ConditionalAttributeSet) -> Self {
        MetricDataPointAttributeOperator { migrator }
    }

    /// Runs the wrapped change set against each data point of `metric`.
    pub fn migrate(&self, selector: StateSelector, metric: &mut Metric) -> MigrationResult {
        let name = metric.name.as_str();
        try_for_each_data_point(&mut metric.data, |data_point| {
            self.migrator
                .migrate(selector, data_point.attributes_mut(), &[name])
        })
    }
}

/// Renames a metric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricSignalNameChange {
    migrator: SignalNameChange,
}

impl MetricSignalNameChange {
    /// Wraps `migrator`, which is run against the metric name.
    pub fn new(migrator: SignalNameChange) -> Self {
        MetricSignalNameChange { migrator }
    }

    /// Renames `metric` if its name is mapped.
    pub fn migrate(&self, selector: StateSelector, metric: &mut Metric) -> MigrationResult {
        self.migrator.migrate(selector, metric);
        Ok(())
    }
}
