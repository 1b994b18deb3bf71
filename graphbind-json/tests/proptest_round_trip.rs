//! Property-based tests for JSON round trips.
//!
//! These tests verify key invariants:
//! - Roundtrip: decode(serialize(decode(p))) == decode(p), unknown properties included
//! - Unknown properties come back out after the declared fields, in payload order, under
//!   exactly the names they arrived with
//! - Unknown enum members settle on the sentinel and stay there

use graphbind_core::{DecodeResult, EnumCodec, FieldDef, ParseNode, Record, ScalarKind, Schema};
use graphbind_json::{record_from_str, record_from_value, to_string, to_value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue, json};

static LEVEL: EnumCodec =
    EnumCodec::single("level", &["low", "high", "unknownFutureValue"]).with_sentinel("unknownFutureValue");

static SAMPLE: Schema = Schema {
    name: "sample",
    discriminator: None,
    base: None,
    fields: &[
        FieldDef::string("id"),
        FieldDef::scalar("count", ScalarKind::Int32),
        FieldDef::enumeration("level", &LEVEL),
        FieldDef::scalars("tags", ScalarKind::String),
    ],
};

fn create_sample(_node: &dyn ParseNode) -> DecodeResult<Record> {
    Ok(Record::new(&SAMPLE))
}

const DECLARED: [&str; 4] = ["id", "count", "level", "tags"];

/// Undeclared property names, including empty and whitespace-padded ones.
fn arb_extra_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "x[A-Za-z0-9]{0,8}",
        1 => Just(String::new()),
        1 => "[ \t]{1,2}x[a-z]{0,4}",
        1 => "x[a-z]{0,4}[ \t]{1,2}",
        1 => Just(" id ".to_string()),
    ]
}

/// Untyped leaf values; nested one level into arrays and objects.
fn arb_untyped() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        ((i64::MAX as u64) + 1..=u64::MAX).prop_map(|u| json!(u)),
        any::<f64>()
            .prop_filter("JSON numbers are finite", |f| f.is_finite())
            .prop_map(|f| json!(f)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(JsonValue::String),
    ];
    leaf.prop_recursive(2, 12, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|members| JsonValue::Object(members.into_iter().collect())),
        ]
    })
}

fn arb_payload() -> impl Strategy<Value = JsonValue> {
    (
        prop::option::of("[a-z0-9-]{1,16}"),
        prop::option::of(any::<i32>()),
        prop::option::of(prop_oneof![
            Just("low".to_string()),
            Just("high".to_string()),
            "[a-z]{1,8}",
        ]),
        prop::option::of(prop::collection::vec("[a-z]{0,6}", 0..4)),
        prop::collection::vec((arb_extra_name(), arb_untyped()), 0..5),
    )
        .prop_map(|(id, count, level, tags, extras)| {
            let mut payload = Map::new();
            if let Some(id) = id {
                payload.insert("id".into(), json!(id));
            }
            if let Some(count) = count {
                payload.insert("count".into(), json!(count));
            }
            if let Some(level) = level {
                payload.insert("level".into(), json!(level));
            }
            if let Some(tags) = tags {
                payload.insert("tags".into(), json!(tags));
            }
            for (name, value) in extras {
                payload.insert(name, value);
            }
            JsonValue::Object(payload)
        })
}

proptest! {
    #[test]
    fn decode_serialize_decode_is_stable(payload in arb_payload()) {
        let first = record_from_value(&payload, create_sample).unwrap();
        let written = to_value(&first).unwrap();
        let second = record_from_value(&written, create_sample).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.additional_data(), second.additional_data());
    }

    #[test]
    fn unknown_properties_survive_in_order(payload in arb_payload()) {
        let record = record_from_value(&payload, create_sample).unwrap();
        let written = to_value(&record).unwrap();

        let extras = |value: &JsonValue| -> Vec<(String, JsonValue)> {
            value
                .as_object()
                .unwrap()
                .iter()
                .filter(|(name, _)| !DECLARED.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        };
        prop_assert_eq!(extras(&payload), extras(&written));
    }

    #[test]
    fn enum_values_are_total(level in "[a-zA-Z]{1,10}") {
        let record = record_from_value(&json!({ "level": level }), create_sample).unwrap();
        let decoded = record.enum_value("level").unwrap();
        if LEVEL.ordinal_of(&level).is_some() {
            prop_assert_eq!(decoded.to_wire_string(), level);
        } else {
            prop_assert!(decoded.is_sentinel());
        }
    }
}

#[test]
fn declared_fields_precede_additional_data() {
    let record = record_from_str(
        r#"{"xTail":1,"tags":["a"],"id":"r1","level":"brandNew"}"#,
        create_sample,
    )
    .unwrap();

    let written = to_value(&record).unwrap();
    let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["id", "level", "tags", "xTail"]);
    assert_eq!(written["level"], json!("unknownFutureValue"));
}

#[test]
fn odd_property_names_are_kept_verbatim() {
    let payload = json!({ "id": "e1", " padded": 1, "": 2, "id ": 3 });
    let record = record_from_value(&payload, create_sample).unwrap();

    let additional = record.additional_data();
    let names: Vec<_> = additional.keys().cloned().collect();
    assert_eq!(names, vec![" padded", "", "id "]);
    assert_eq!(record.string("id"), Some("e1"));
    assert_eq!(to_value(&record).unwrap(), payload);
}

#[test]
fn integers_beyond_i64_are_written_back_exactly() {
    let payload = json!({ "id": "e1", "xBig": u64::MAX, "xRatio": 0.1 });
    let record = record_from_value(&payload, create_sample).unwrap();
    assert_eq!(to_value(&record).unwrap(), payload);
    assert_eq!(
        to_string(&record).unwrap(),
        r#"{"id":"e1","xBig":18446744073709551615,"xRatio":0.1}"#
    );
}

#[test]
fn explicit_null_is_written_back() {
    let record = record_from_str(r#"{"id":null,"xGone":null}"#, create_sample).unwrap();
    assert_eq!(
        to_value(&record).unwrap(),
        json!({ "id": null, "xGone": null })
    );
}
