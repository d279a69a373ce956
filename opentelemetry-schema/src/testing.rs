//! Fixtures shared by unit tests.
use opentelemetry_proto::tonic::common::v1::{any_value::Value, AnyValue, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{
    metric::Data, Histogram, HistogramDataPoint, Metric,
};
use opentelemetry_proto::tonic::trace::v1::{span::Event, Span};

pub(crate) fn attrs(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
    pairs
        .iter()
        .map(|(key, value)| KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(Value::StringValue(value.to_string())),
            }),
        })
        .collect()
}

pub(crate) fn keys(attributes: &[KeyValue]) -> Vec<&str> {
    attributes.iter().map(|kv| kv.key.as_str()).collect()
}

/// A span named `span_name` with one event per name, each carrying
/// `attr_key = "1"`.
pub(crate) fn span_with_events(span_name: &str, event_names: &[&str], attr_key: &str) -> Span {
    Span {
        name: span_name.to_string(),
        events: event_names
            .iter()
            .map(|name| Event {
                name: name.to_string(),
                attributes: attrs(&[(attr_key, "1")]),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub(crate) fn histogram(name: &str, data_points: Vec<Vec<KeyValue>>) -> Metric {
    Metric {
        name: name.to_string(),
        data: Some(Data::Histogram(Histogram {
            data_points: data_points
                .into_iter()
                .map(|attributes| HistogramDataPoint {
                    attributes,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })),
        ..Default::default()
    }
}
