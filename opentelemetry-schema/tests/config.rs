#![cfg(feature = "config")]

use std::io::Write;

use opentelemetry_proto::tonic::common::v1::{any_value::Value, AnyValue, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{
    metric::Data, Histogram, HistogramDataPoint, Metric,
};
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::{span::Event, Span};
use opentelemetry_schema::config::{ChangeListConfig, SignalCategory, TranslationConfig};
use opentelemetry_schema::{MigrationError, Translation};

const SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/schema.yaml");

fn attrs(keys: &[&str]) -> Vec<KeyValue> {
    keys.iter()
        .map(|key| KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(Value::StringValue("value".to_string())),
            }),
        })
        .collect()
}

fn keys(attributes: &[KeyValue]) -> Vec<&str> {
    attributes.iter().map(|kv| kv.key.as_str()).collect()
}

fn load() -> Translation {
    TranslationConfig::from_yaml_file(SCHEMA)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn schema_file_builds_every_version() {
    let translation = load();
    assert_eq!(
        translation.versions().collect::<Vec<_>>(),
        ["1.20.0", "1.21.0", "1.22.0"]
    );
}

#[test]
fn span_and_events_round_trip_through_schema_file() {
    let translation = load();
    let original = Span {
        name: "GET /users".to_string(),
        attributes: attrs(&["http.method", "net.host.name"]),
        events: vec![
            Event {
                name: "exception".to_string(),
                attributes: attrs(&["exception.msg", "net.host.name"]),
                ..Default::default()
            },
            Event {
                name: "retry".to_string(),
                attributes: attrs(&["exception.msg"]),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let mut span = original.clone();

    translation
        .migrate_span(&mut span, "1.20.0", "1.22.0")
        .unwrap();
    assert_eq!(
        keys(&span.attributes),
        ["http.request.method", "server.address"]
    );
    assert_eq!(span.events[0].name, "exception.recorded");
    assert_eq!(
        keys(&span.events[0].attributes),
        ["exception.message", "server.address"]
    );
    assert_eq!(span.events[1].name, "retry");
    assert_eq!(keys(&span.events[1].attributes), ["exception.msg"]);

    translation
        .migrate_span(&mut span, "1.22.0", "1.20.0")
        .unwrap();
    assert_eq!(span, original);
}

#[test]
fn metric_round_trips_through_schema_file() {
    let translation = load();
    let original = Metric {
        name: "http.server.duration".to_string(),
        data: Some(Data::Histogram(Histogram {
            data_points: vec![HistogramDataPoint {
                attributes: attrs(&["http.method", "net.host.name"]),
                ..Default::default()
            }],
            ..Default::default()
        })),
        ..Default::default()
    };
    let mut metric = original.clone();

    translation
        .migrate_metric(&mut metric, "1.20.0", "1.21.0")
        .unwrap();
    assert_eq!(metric.name, "http.server.request.duration");
    match metric.data.as_ref() {
        Some(Data::Histogram(histogram)) => assert_eq!(
            keys(&histogram.data_points[0].attributes),
            ["http.request.method", "server.address"]
        ),
        other => panic!("unexpected metric data {other:?}"),
    }

    translation
        .migrate_metric(&mut metric, "1.21.0", "1.20.0")
        .unwrap();
    assert_eq!(metric, original);
}

#[test]
fn resource_changes_only_apply_from_their_version() {
    let translation = load();
    let mut resource = Resource {
        attributes: attrs(&["telemetry.auto.version", "net.host.name"]),
        ..Default::default()
    };

    translation
        .migrate_resource(&mut resource, "1.20.0", "1.21.0")
        .unwrap();
    assert_eq!(
        keys(&resource.attributes),
        ["telemetry.auto.version", "server.address"]
    );

    translation
        .migrate_resource(&mut resource, "1.21.0", "1.22.0")
        .unwrap();
    assert_eq!(
        keys(&resource.attributes),
        ["telemetry.distro.version", "server.address"]
    );
}

#[test]
fn change_list_from_temporary_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "changes:\n  - rename_metrics:\n      name_map:\n        a: b\n"
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let changes = ChangeListConfig::from_yaml_file(path)
        .unwrap()
        .build(SignalCategory::Metrics)
        .unwrap();
    let mut metric = Metric {
        name: "a".to_string(),
        ..Default::default()
    };
    changes.apply(&mut metric).unwrap();
    assert_eq!(metric.name, "b");
}

#[test]
fn missing_file_is_config_error() {
    let err = TranslationConfig::from_yaml_file("/nonexistent/schema.yaml").unwrap_err();
    assert!(matches!(err, MigrationError::Config(_)));
}
