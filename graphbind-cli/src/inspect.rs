//! Record summaries and property edits used by the `decode` and `roundtrip` commands.

use anyhow::Context;
use graphbind_core::{ParseNode, Record, SerializationWriter, Value};
use graphbind_json::{JsonParseNode, JsonSerializationWriter};
use serde_json::{Value as JsonValue, json};

/// `type`, `schema`, the declared properties present and the additional data of a record.
pub fn summarize(record: &Record) -> anyhow::Result<JsonValue> {
    let declared: Vec<&str> = record
        .schema()
        .all_fields()
        .into_iter()
        .map(|field| field.name)
        .filter(|name| record.contains(name))
        .collect();

    Ok(json!({
        "type": record.odata_type(),
        "schema": record.schema().name,
        "declared": declared,
        "additional": additional_to_json(record)?,
    }))
}

fn additional_to_json(record: &Record) -> anyhow::Result<JsonValue> {
    let additional = record.additional_data();
    let entries: Vec<(&str, &Value)> = additional
        .iter()
        .map(|(name, value)| (name.as_str(), value))
        .collect();

    let mut writer = JsonSerializationWriter::new();
    writer.start_object(None)?;
    writer.write_additional_data(&entries)?;
    writer.end_object()?;
    writer.into_value().context("render additional data")
}

/// Apply a `name=value` edit. The value is read as JSON, falling back to a plain string, and
/// goes through the field's deserializer when `name` is declared.
pub fn apply_edit(record: &mut Record, assignment: &str) -> anyhow::Result<()> {
    let (name, raw) = assignment
        .split_once('=')
        .map(|(name, raw)| (name.trim(), raw))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow::anyhow!("invalid edit '{}': expected name=value", assignment))?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
    let node = JsonParseNode::new(&value);
    let node: &dyn ParseNode = &node;

    let deserializers = record.field_deserializers();
    match deserializers.get(name) {
        Some(deserialize) => deserialize(record, node)
            .map_err(|e| e.in_field(name))
            .with_context(|| format!("edit '{}'", assignment))?,
        None => {
            let untyped = node.untyped_value()?;
            record
                .set(name, untyped)
                .with_context(|| format!("edit '{}'", assignment))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbind_json::record_from_str;
    use graphbind_types::security::create_host;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_lists_declared_and_additional() {
        let record = record_from_str(
            r##"{"@odata.type":"#microsoft.graph.security.hostname","id":"h","registrar":"r","extra":[1]}"##,
            create_host,
        )
        .unwrap();

        assert_eq!(
            summarize(&record).unwrap(),
            json!({
                "type": "#microsoft.graph.security.hostname",
                "schema": "microsoft.graph.security.hostname",
                "declared": ["id", "@odata.type", "registrar"],
                "additional": { "extra": [1] }
            })
        );
    }

    #[test]
    fn edits_use_field_deserializers() {
        let mut record = record_from_str("{}", create_host).unwrap();
        apply_edit(&mut record, "lastSeenDateTime=2024-05-01T00:00:00Z").unwrap();
        apply_edit(&mut record, "note={\"a\":1}").unwrap();

        assert!(record.date_time("lastSeenDateTime").is_some());
        assert!(record.backing_store().is_changed("lastSeenDateTime"));
        assert_eq!(
            record.additional_data().get("note").and_then(Value::as_map).map(|m| m.len()),
            Some(1)
        );
    }

    #[test]
    fn nested_edit_is_written_whole_when_only_changes_are_kept() {
        let mut record = record_from_str(r#"{"id":"h1"}"#, create_host).unwrap();
        apply_edit(&mut record, r#"reputation={"score":7,"classification":"malicious"}"#).unwrap();
        record.set_return_only_changed_values(true);

        let written = graphbind_json::to_value(&record).unwrap();
        assert_eq!(written["reputation"]["score"], json!(7));
        assert_eq!(written["reputation"]["classification"], json!("malicious"));
        assert!(written.get("id").is_none());
    }

    #[test]
    fn bad_edits_are_rejected() {
        let mut record = record_from_str("{}", create_host).unwrap();
        assert!(apply_edit(&mut record, "no-equals").is_err());
        assert!(apply_edit(&mut record, "=1").is_err());
        assert!(apply_edit(&mut record, "firstSeenDateTime=yesterday").is_err());
    }
}
