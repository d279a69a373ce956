//! The telemetry shapes a migration can act on.
//!
//! Signals are the OTLP protobuf messages from [`opentelemetry_proto`]. The
//! engine only ever borrows them: every migrator receives a `&mut` to the
//! signal for the duration of a single call.
use opentelemetry_proto::tonic::common::v1::{InstrumentationScope, KeyValue};
use opentelemetry_proto::tonic::logs::v1::LogRecord;
use opentelemetry_proto::tonic::metrics::v1::{
    metric::Data, ExponentialHistogramDataPoint, HistogramDataPoint, Metric, NumberDataPoint,
    SummaryDataPoint,
};
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::{span::Event, Span};

use crate::error::MigrationResult;

/// Anything that owns a mutable attribute container.
pub trait Attributed {
    /// The attributes of this entity, in their wire order.
    fn attributes_mut(&mut self) -> &mut Vec<KeyValue>;

    /// A short type name used in error messages.
    fn signal_type(&self) -> &'static str;
}

/// A signal whose own name is part of the schema, such as a metric or a
/// span event.
pub trait NamedSignal {
    /// Current name of the signal.
    fn name(&self) -> &str;

    /// Replace the name of the signal.
    fn set_name(&mut self, name: String);
}

macro_rules! impl_attributed {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Attributed for $ty {
                fn attributes_mut(&mut self) -> &mut Vec<KeyValue> {
                    &mut self.attributes
                }

                fn signal_type(&self) -> &'static str {
                    $name
                }
            }
        )+
    };
}

impl_attributed!(
    Event => "Event",
    Resource => "Resource",
    LogRecord => "LogRecord",
    InstrumentationScope => "InstrumentationScope",
    NumberDataPoint => "NumberDataPoint",
    HistogramDataPoint => "HistogramDataPoint",
    ExponentialHistogramDataPoint => "ExponentialHistogramDataPoint",
    SummaryDataPoint => "SummaryDataPoint",
);

macro_rules! impl_named {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl NamedSignal for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn set_name(&mut self, name: String) {
                    self.name = name;
                }
            }
        )+
    };
}

impl_named!(Span, Event, Metric);

/// A borrowed signal handed to a [`ChangeList`](crate::ChangeList).
///
/// Span and metric changelists need the concrete message to reach names,
/// events and data points. Everything else only needs its attributes.
#[derive(Debug)]
pub enum Signal<'a> {
    /// A span, including its events.
    Span(&'a mut Span),
    /// A metric, including all of its data points.
    Metric(&'a mut Metric),
    /// Any other attribute bearing entity, e.g. a resource or a log record.
    Attributed(&'a mut dyn Attributed),
}

impl Signal<'_> {
    /// A short type name used in error messages.
    pub fn signal_type(&self) -> &'static str {
        match self {
            Signal::Span(_) => "Span",
            Signal::Metric(_) => "Metric",
            Signal::Attributed(attributed) => attributed.signal_type(),
        }
    }
}

impl std::fmt::Debug for dyn Attributed + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attributed")
            .field("signal_type", &self.signal_type())
            .finish()
    }
}

impl<'a> From<&'a mut Span> for Signal<'a> {
    fn from(span: &'a mut Span) -> Self {
        Signal::Span(span)
    }
}

impl<'a> From<&'a mut Metric> for Signal<'a> {
    fn from(metric: &'a mut Metric) -> Self {
        Signal::Metric(metric)
    }
}

macro_rules! impl_from_attributed {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Signal<'a> {
                fn from(attributed: &'a mut $ty) -> Self {
                    Signal::Attributed(attributed)
                }
            }
        )+
    };
}

impl_from_attributed!(
    Event,
    Resource,
    LogRecord,
    InstrumentationScope,
    NumberDataPoint,
    HistogramDataPoint,
    ExponentialHistogramDataPoint,
    SummaryDataPoint,
);

/// Runs `f` against every data point of a metric's `data`, in order,
/// stopping at the first error.
pub(crate) fn try_for_each_data_point<F>(data: &mut Option<Data>, mut f: F) -> MigrationResult
where
    F: FnMut(&mut dyn Attributed) -> MigrationResult,
{
    match data.as_mut() {
        Some(Data::Gauge(gauge)) => gauge.data_points.iter_mut().try_for_each(|dp| f(dp)),
        Some(Data::Sum(sum)) => sum.data_points.iter_mut().try_for_each(|dp| f(dp)),
        Some(Data::Histogram(histogram)) => {
            histogram.data_points.iter_mut().try_for_each(|dp| f(dp))
        }
        Some(Data::ExponentialHistogram(histogram)) => {
            histogram.data_points.iter_mut().try_for_each(|dp| f(dp))
        }
        Some(Data::Summary(summary)) => summary.data_points.iter_mut().try_for_each(|dp| f(dp)),
        None => Ok(()),
    }
}
