use chrono::NaiveDateTime;
use trellis::prelude::*;

use common::{int, null, rows, text};

mod common;

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Reading {
    #[model(id)]
    id: i64,
    count: u32,
    level: u8,
    ratio: f32,
    active: bool,
    taken_at: Option<NaiveDateTime>,
}

#[test]
fn checked_narrowing_into_each_destination_kind() {
    let rows = rows(
        &[
            "reading.id",
            "reading.count",
            "reading.level",
            "reading.ratio",
            "reading.active",
            "reading.taken_at",
        ],
        vec![vec![
            int(1),
            int(42),
            int(200),
            Value::Float(0.5),
            int(1),
            text("2024-07-01 10:30:00"),
        ]],
    );

    let mut readings: Vec<Reading> = Vec::new();
    materialize_all(rows, &mut readings).unwrap();

    let reading = &readings[0];
    assert_eq!(reading.count, 42);
    assert_eq!(reading.level, 200);
    assert_eq!(reading.ratio, 0.5);
    assert!(reading.active);
    assert_eq!(
        reading.taken_at.map(|t| t.to_string()),
        Some("2024-07-01 10:30:00".to_string())
    );
}

#[test]
fn negative_into_unsigned_errors_instead_of_wrapping() {
    let rows = rows(&["reading.id", "reading.count"], vec![vec![int(1), int(-1)]]);

    let mut readings: Vec<Reading> = Vec::new();
    let err = materialize_all(rows, &mut readings).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("count"), "unexpected error: {message}");
    assert!(message.contains("overflows"), "unexpected error: {message}");
    assert!(readings.is_empty());
}

#[test]
fn out_of_range_narrowing_errors() {
    let rows = rows(&["reading.id", "reading.level"], vec![vec![int(1), int(256)]]);

    let mut readings: Vec<Reading> = Vec::new();
    assert!(materialize_all(rows, &mut readings).is_err());
}

#[test]
fn non_binary_integers_are_not_bools() {
    let rows = rows(&["reading.id", "reading.active"], vec![vec![int(1), int(2)]]);

    let mut readings: Vec<Reading> = Vec::new();
    let err = materialize_all(rows, &mut readings).unwrap_err();
    assert!(err.to_string().contains("active"));
}

#[test]
fn null_cells_leave_optional_scalars_empty() {
    let rows = rows(
        &["reading.id", "reading.taken_at"],
        vec![vec![int(1), null()]],
    );

    let mut readings: Vec<Reading> = Vec::new();
    materialize_all(rows, &mut readings).unwrap();
    assert_eq!(readings[0].taken_at, None);
}

// -- custom decode ------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq)]
struct CommaList(Vec<String>);

impl FromCell for CommaList {
    fn from_cell(value: &Value<'_>) -> std::result::Result<Self, CoerceError> {
        match value {
            Value::Text(t) => Ok(CommaList(
                t.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect(),
            )),
            other => Err(CoerceError::custom(format!(
                "expected comma-separated text, got {}",
                other.kind_name()
            ))),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
struct Labelled {
    #[model(id)]
    id: i64,
    #[model(custom)]
    labels: CommaList,
}

#[test]
fn custom_decode_preempts_default_coercion() {
    let rows = rows(
        &["labelled.id", "labelled.labels"],
        vec![vec![int(1), text("red, green , blue")]],
    );

    let mut out: Vec<Labelled> = Vec::new();
    materialize_all(rows, &mut out).unwrap();

    assert_eq!(
        out[0].labels,
        CommaList(vec![
            "red".to_string(),
            "green".to_string(),
            "blue".to_string(),
        ])
    );
}

#[test]
fn custom_decode_failure_carries_field_context() {
    let rows = rows(
        &["labelled.id", "labelled.labels"],
        vec![vec![int(1), int(7)]],
    );

    let mut out: Vec<Labelled> = Vec::new();
    let err = materialize_all(rows, &mut out).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("labels"), "unexpected error: {message}");
    assert!(message.contains("CommaList"), "unexpected error: {message}");
    assert!(
        message.contains("expected comma-separated text"),
        "unexpected error: {message}"
    );
}

#[test]
fn timestamps_parse_from_driver_text_encodings() {
    let encodings = [
        "2024-07-01 10:30:00",
        "2024-07-01T10:30:00",
        "2024-07-01 10:30:00.250",
        "2024-07-01",
    ];

    for encoding in encodings {
        let rows = rows(
            &["reading.id", "reading.taken_at"],
            vec![vec![int(1), text(encoding)]],
        );
        let mut readings: Vec<Reading> = Vec::new();
        materialize_all(rows, &mut readings).unwrap();
        assert!(readings[0].taken_at.is_some(), "failed for {encoding:?}");
    }
}
