//! # Declarative change list configuration
//!
//! Describes changelists, and whole translations, as YAML documents that
//! build into [`ChangeList`] and [`Translation`] values.
//!
//! ```yaml
//! versions:
//!   - version: 1.0.0
//!   - version: 1.1.0
//!     spans:
//!       changes:
//!         - rename_span_attributes:
//!             attribute_map:
//!               http.method: http.request.method
//!             apply_to_spans: [ "http.server" ]
//! ```
use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::changelist::{ChangeList, Migrator};
use crate::error::{MigrationError, MigrationResult};
use crate::migrate::{
    AttributeChangeSet, ConditionalAttributeSet, MultiConditionalAttributeSet, SignalNameChange,
};
use crate::operator::{
    MetricDataPointAttributeOperator, MetricSignalNameChange, SpanConditionalAttributeOperator,
    SpanEventConditionalAttributeOperator, SpanEventSignalNameChange, EVENT_NAME_KEY,
    SPAN_NAME_KEY,
};
use crate::translation::{Revision, Translation};

/// The signal category a changelist is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalCategory {
    /// Changes applied to every attribute bearing entity.
    All,
    /// Resources.
    Resources,
    /// Spans.
    Spans,
    /// Events of spans.
    SpanEvents,
    /// Metrics.
    Metrics,
    /// Log records.
    Logs,
}

impl SignalCategory {
    /// Name of the category as used in configuration documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::All => "all",
            SignalCategory::Resources => "resources",
            SignalCategory::Spans => "spans",
            SignalCategory::SpanEvents => "span_events",
            SignalCategory::Metrics => "metrics",
            SignalCategory::Logs => "logs",
        }
    }
}

/// Configuration for a single changelist.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ChangeListConfig {
    /// Changes in apply order, each a single key map naming its kind.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub changes: Vec<ChangeConfig>,
}

impl ChangeListConfig {
    /// Creates a ChangeListConfig from a YAML string
    pub fn from_yaml(yaml_str: &str) -> MigrationResult<Self> {
        serde_yaml::from_str(yaml_str).map_err(|err| MigrationError::Config(err.to_string()))
    }

    /// Creates a ChangeListConfig from a YAML file
    pub fn from_yaml_file(file_path: &str) -> MigrationResult<Self> {
        let yaml_str = read_file(file_path)?;
        Self::from_yaml(&yaml_str)
    }

    /// Builds the changelist for `category`.
    ///
    /// Fails with [`MigrationError::UnsupportedMigrator`] if a change does
    /// not apply to signals of that category.
    pub fn build(self, category: SignalCategory) -> MigrationResult<ChangeList> {
        self.changes
            .into_iter()
            .map(|change| change.into_migrator(category))
            .collect()
    }
}

/// One change of a changelist.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeConfig {
    /// Renames attributes of the signal itself.
    RenameAttributes(RenameAttributes),
    /// Renames span attributes, optionally only on some spans.
    RenameSpanAttributes(RenameSpanAttributes),
    /// Renames span event attributes, optionally only on some events of
    /// some spans.
    RenameSpanEventAttributes(RenameSpanEventAttributes),
    /// Renames span events.
    RenameSpanEvents(RenameSignals),
    /// Renames metrics.
    RenameMetrics(RenameSignals),
    /// Renames metric data point attributes, optionally only on some
    /// metrics.
    RenameMetricAttributes(RenameMetricAttributes),
}

/// Attribute renames that apply unconditionally.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenameAttributes {
    /// Old key to new key.
    pub attribute_map: BTreeMap<String, String>,
}

/// Attribute renames gated on span names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenameSpanAttributes {
    /// Old key to new key.
    pub attribute_map: BTreeMap<String, String>,
    /// Span names to apply to; empty means every span.
    #[serde(default)]
    pub apply_to_spans: Vec<String>,
}

/// Attribute renames gated on event and span names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenameSpanEventAttributes {
    /// Old key to new key.
    pub attribute_map: BTreeMap<String, String>,
    /// Span names to apply to; empty means every span.
    #[serde(default)]
    pub apply_to_spans: Vec<String>,
    /// Event names to apply to; empty means every event.
    #[serde(default)]
    pub apply_to_events: Vec<String>,
}

/// Renames of signals themselves.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenameSignals {
    /// Old name to new name.
    pub name_map: BTreeMap<String, String>,
}

/// Data point attribute renames gated on metric names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RenameMetricAttributes {
    /// Old key to new key.
    pub attribute_map: BTreeMap<String, String>,
    /// Metric names to apply to; empty means every metric.
    #[serde(default)]
    pub apply_to_metrics: Vec<String>,
}

impl ChangeConfig {
    /// Name of the change kind as used in configuration documents.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeConfig::RenameAttributes(_) => "rename_attributes",
            ChangeConfig::RenameSpanAttributes(_) => "rename_span_attributes",
            ChangeConfig::RenameSpanEventAttributes(_) => "rename_span_event_attributes",
            ChangeConfig::RenameSpanEvents(_) => "rename_span_events",
            ChangeConfig::RenameMetrics(_) => "rename_metrics",
            ChangeConfig::RenameMetricAttributes(_) => "rename_metric_attributes",
        }
    }

    /// Builds the migrator for a changelist of `category`.
    pub fn into_migrator(self, category: SignalCategory) -> MigrationResult<Migrator> {
        use SignalCategory::*;

        match (self, category) {
            (ChangeConfig::RenameAttributes(change), All | Resources | Spans | Logs) => {
                Ok(AttributeChangeSet::new(unique_targets(change.attribute_map)?).into())
            }
            (ChangeConfig::RenameSpanAttributes(change), Spans) => {
                Ok(SpanConditionalAttributeOperator::new(ConditionalAttributeSet::new(
                    AttributeChangeSet::new(unique_targets(change.attribute_map)?),
                    change.apply_to_spans,
                ))
                .into())
            }
            (ChangeConfig::RenameSpanEventAttributes(change), SpanEvents) => {
                Ok(SpanEventConditionalAttributeOperator::new(
                    MultiConditionalAttributeSet::new(
                        AttributeChangeSet::new(unique_targets(change.attribute_map)?),
                        [
                            (EVENT_NAME_KEY, change.apply_to_events),
                            (SPAN_NAME_KEY, change.apply_to_spans),
                        ],
                    ),
                )
                .into())
            }
            (ChangeConfig::RenameSpanEvents(change), SpanEvents) => {
                let names = SignalNameChange::new(unique_targets(change.name_map)?);
                Ok(SpanEventSignalNameChange::new(names).into())
            }
            (ChangeConfig::RenameMetrics(change), Metrics) => {
                let names = SignalNameChange::new(unique_targets(change.name_map)?);
                Ok(MetricSignalNameChange::new(names).into())
            }
            (ChangeConfig::RenameMetricAttributes(change), Metrics) => {
                Ok(MetricDataPointAttributeOperator::new(ConditionalAttributeSet::new(
                    AttributeChangeSet::new(unique_targets(change.attribute_map)?),
                    change.apply_to_metrics,
                ))
                .into())
            }
            (change, category) => Err(MigrationError::UnsupportedMigrator {
                migrator: change.kind().to_string(),
                signal_category: category.as_str(),
            }),
        }
    }
}

/// Configuration for the changes leading to one schema version.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RevisionConfig {
    /// The schema version.
    pub version: String,
    /// Changes for every attribute bearing entity.
    #[serde(default)]
    pub all: ChangeListConfig,
    /// Changes for resources.
    #[serde(default)]
    pub resources: ChangeListConfig,
    /// Changes for spans.
    #[serde(default)]
    pub spans: ChangeListConfig,
    /// Changes for span events.
    #[serde(default)]
    pub span_events: ChangeListConfig,
    /// Changes for metrics.
    #[serde(default)]
    pub metrics: ChangeListConfig,
    /// Changes for log records.
    #[serde(default)]
    pub logs: ChangeListConfig,
}

impl RevisionConfig {
    /// Builds the revision.
    pub fn build(self) -> MigrationResult<Revision> {
        Ok(Revision::builder(self.version)
            .with_all(self.all.build(SignalCategory::All)?)
            .with_resources(self.resources.build(SignalCategory::Resources)?)
            .with_spans(self.spans.build(SignalCategory::Spans)?)
            .with_span_events(self.span_events.build(SignalCategory::SpanEvents)?)
            .with_metrics(self.metrics.build(SignalCategory::Metrics)?)
            .with_logs(self.logs.build(SignalCategory::Logs)?)
            .build())
    }
}

/// Configuration for a [`Translation`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TranslationConfig {
    /// Schema versions, oldest first.
    #[serde(default)]
    pub versions: Vec<RevisionConfig>,
}

impl TranslationConfig {
    /// Creates a TranslationConfig from a YAML string
    pub fn from_yaml(yaml_str: &str) -> MigrationResult<Self> {
        serde_yaml::from_str(yaml_str).map_err(|err| MigrationError::Config(err.to_string()))
    }

    /// Creates a TranslationConfig from a YAML file
    pub fn from_yaml_file(file_path: &str) -> MigrationResult<Self> {
        let yaml_str = read_file(file_path)?;
        Self::from_yaml(&yaml_str)
    }

    /// Builds the translation.
    pub fn build(self) -> MigrationResult<Translation> {
        self.versions
            .into_iter()
            .map(RevisionConfig::build)
            .collect::<MigrationResult<Vec<_>>>()
            .map(Translation::new)
    }
}

/// Rejects maps that rename two sources to one target, as such a rename can
/// not be rolled back.
fn unique_targets(map: BTreeMap<String, String>) -> MigrationResult<BTreeMap<String, String>> {
    let duplicate = {
        let mut targets = HashSet::new();
        map.values().find(|to| !targets.insert(to.as_str())).cloned()
    };
    match duplicate {
        Some(to) => Err(MigrationError::Config(format!(
            "{to:?} is the target of more than one rename"
        ))),
        None => Ok(map),
    }
}

fn read_file(file_path: &str) -> MigrationResult<String> {
    std::fs::read_to_string(file_path)
        .map_err(|err| MigrationError::Config(format!("{file_path}: {err}")))
}
