use anyhow::{Context, Result};
use fieldmap::prelude::*;
use fieldmap::StateConfig;
use serde_json::json;

#[derive(Record, Clone, Default, Debug)]
#[record(nested)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Record, Clone, Default, Debug)]
struct Segment {
    label: String,
    start: Point,
    end: Option<Point>,
    tags: Vec<String>,
}

fn segment() -> Segment {
    Segment {
        label: "ab".into(),
        start: Point { x: 1, y: 2 },
        end: Some(Point { x: 3, y: 4 }),
        tags: vec!["hot".into()],
    }
}

#[test]
fn flat_export_shape() {
    let state = Point { x: 1, y: -2 }.export_state();
    let keys: Vec<&str> = state.keys().map(String::as_str).collect();
    assert_eq!(keys, ["type_name", "module_path", "x", "y"]);
    assert_eq!(state["type_name"], "Point");
    assert_eq!(state["module_path"], module_path!());
    assert_eq!(state["y"], -2);
}

#[test]
fn flat_round_trip() -> Result<()> {
    let original = Point { x: 7, y: 9 };
    let state = original.export_state();

    let mut restored = Point::default();
    restored.import_state(&state)?;
    assert!(restored.items().eq(original.items()));
    Ok(())
}

#[test]
fn nested_records_export_their_own_state() {
    let state = segment().export_state();
    assert_eq!(
        serde_json::Value::Object(state),
        json!({
            "type_name": "Segment",
            "module_path": module_path!(),
            "label": "ab",
            "start": {"type_name": "Point", "module_path": module_path!(), "x": 1, "y": 2},
            "end": {"type_name": "Point", "module_path": module_path!(), "x": 3, "y": 4},
            "tags": ["hot"],
        })
    );
}

#[test]
fn nested_export_can_be_disabled() -> Result<()> {
    let config = StateConfig::parse("export_nested = false")?;
    let state = segment().export_state_with(&config);
    assert_eq!(state["start"], json!({"x": 1, "y": 2}));
    Ok(())
}

#[test]
fn missing_nested_value_exports_null() {
    let mut s = segment();
    s.end = None;
    assert!(s.export_state()["end"].is_null());
}

#[test]
fn nested_fields_are_rebuilt_by_their_field_type() -> Result<()> {
    let state = segment().export_state();
    let mut restored = Segment::default();
    restored.import_state(&state)?;

    assert_eq!(restored.start.y, 2);
    let end = restored.end.as_ref().context("end not restored")?;
    assert_eq!((end.x, end.y), (3, 4));
    assert_eq!(restored.tags, ["hot"]);
    Ok(())
}

#[test]
fn nested_value_is_a_mapping() -> Result<()> {
    let s = segment();
    let start = s.get("start")?;
    assert_eq!(start.get("x"), Some(&Value::Int(1)));
    assert_eq!(start.get("type_name"), None);
    Ok(())
}

#[test]
fn nested_errors_carry_the_field_path() {
    let mut s = Segment::default();
    let err = s
        .set(
            "start",
            Value::Map(vec![("x".into(), Value::Int(1)), ("z".into(), Value::Int(0))]),
        )
        .unwrap_err();
    assert_eq!(err, RecordError::UnknownField("start.z".into()));

    let err = s.set("start", Value::Int(3)).unwrap_err();
    assert_eq!(
        err,
        RecordError::invalid_value("start", "expected map, found int")
    );
}

#[test]
fn import_unknown_field_fails_after_partial_assignment() {
    let mut state = Point { x: 5, y: 6 }.export_state();
    state.insert("w".into(), json!(1));

    let mut p = Point::default();
    assert_eq!(
        p.import_state(&state),
        Err(RecordError::UnknownField("w".into()))
    );
    assert_eq!((p.x, p.y), (5, 6));
}

#[test]
fn custom_reserved_keys() -> Result<()> {
    let config = StateConfig::parse(
        r#"
        type_key = "__type__"
        module_key = "__module__"
        "#,
    )?;
    let state = Point { x: 1, y: 1 }.export_state_with(&config);
    assert_eq!(state["__type__"], "Point");
    assert!(!state.contains_key("type_name"));

    let mut p = Point::default();
    p.import_state_with(&state, &config)?;
    assert_eq!(p.x, 1);

    // Default config does not know the custom keys.
    assert_eq!(
        Point::default().import_state(&state),
        Err(RecordError::UnknownField("__type__".into()))
    );
    Ok(())
}

#[test]
fn state_survives_json_text() -> Result<()> {
    let text = serde_json::to_string(&segment().export_state())?;
    let state: State = serde_json::from_str(&text)?;
    let mut restored = Segment::default();
    restored.import_state(&state)?;
    assert_eq!(restored.label, "ab");
    Ok(())
}
