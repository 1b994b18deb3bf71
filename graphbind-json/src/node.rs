use graphbind_core::{DecodeError, DecodeResult, ParseNode, PropertyMap, Value};
use serde_json::Value as JsonValue;

/// [`ParseNode`] over a borrowed `serde_json` tree.
#[derive(Debug, Clone, Copy)]
pub struct JsonParseNode<'a> {
    value: &'a JsonValue,
}

impl<'a> JsonParseNode<'a> {
    pub fn new(value: &'a JsonValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a JsonValue {
        self.value
    }

    fn wrong_type(&self, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            expected,
            found: json_kind(self.value),
        }
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "fractional number",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl ParseNode for JsonParseNode<'_> {
    fn child_node(&self, name: &str) -> Option<Box<dyn ParseNode + '_>> {
        let child = self.value.as_object()?.get(name)?;
        Some(Box::new(JsonParseNode::new(child)))
    }

    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn string_value(&self) -> DecodeResult<Option<String>> {
        match self.value {
            JsonValue::Null => Ok(None),
            JsonValue::String(s) => Ok(Some(s.clone())),
            _ => Err(self.wrong_type("string")),
        }
    }

    fn bool_value(&self) -> DecodeResult<Option<bool>> {
        match self.value {
            JsonValue::Null => Ok(None),
            JsonValue::Bool(b) => Ok(Some(*b)),
            _ => Err(self.wrong_type("bool")),
        }
    }

    fn i64_value(&self) -> DecodeResult<Option<i64>> {
        match self.value {
            JsonValue::Null => Ok(None),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None if n.is_u64() => Err(DecodeError::OutOfRange {
                    kind: "int64",
                    value: n.to_string(),
                }),
                None => Err(self.wrong_type("integer")),
            },
            _ => Err(self.wrong_type("integer")),
        }
    }

    fn f64_value(&self) -> DecodeResult<Option<f64>> {
        match self.value {
            JsonValue::Null => Ok(None),
            JsonValue::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type("number")),
            _ => Err(self.wrong_type("number")),
        }
    }

    fn collection_nodes(&self) -> DecodeResult<Option<Vec<Box<dyn ParseNode + '_>>>> {
        match self.value {
            JsonValue::Null => Ok(None),
            JsonValue::Array(items) => Ok(Some(
                items
                    .iter()
                    .map(|item| Box::new(JsonParseNode::new(item)) as Box<dyn ParseNode + '_>)
                    .collect(),
            )),
            _ => Err(self.wrong_type("array")),
        }
    }

    fn property_nodes(&self) -> DecodeResult<Vec<(String, Box<dyn ParseNode + '_>)>> {
        match self.value {
            JsonValue::Object(members) => Ok(members
                .iter()
                .map(|(name, member)| {
                    (
                        name.clone(),
                        Box::new(JsonParseNode::new(member)) as Box<dyn ParseNode + '_>,
                    )
                })
                .collect()),
            _ => Err(self.wrong_type("object")),
        }
    }

    fn untyped_value(&self) -> DecodeResult<Value> {
        Ok(untyped(self.value))
    }
}

/// Strings stay strings; no date or UUID sniffing.
fn untyped(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => Value::UInt(u),
            (None, None) => n.as_f64().map_or(Value::Null, Value::Float),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(untyped).collect()),
        JsonValue::Object(members) => Value::Map(
            members
                .iter()
                .map(|(name, member)| (name.clone(), untyped(member)))
                .collect::<PropertyMap>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn property_nodes_keep_payload_order() {
        let payload = json!({ "zeta": 1, "alpha": 2, "mid": 3 });
        let node = JsonParseNode::new(&payload);
        let names: Vec<_> = node
            .property_nodes()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let payload = json!(1.5);
        let err = JsonParseNode::new(&payload).i64_value().unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongType {
                expected: "integer",
                found: "fractional number"
            }
        );
    }

    #[test]
    fn huge_unsigned_integer_is_out_of_range() {
        let payload = json!(u64::MAX);
        let err = JsonParseNode::new(&payload).i64_value().unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { kind: "int64", .. }));
    }

    #[test]
    fn untyped_strings_are_not_sniffed() {
        let payload = json!("2024-01-01T00:00:00Z");
        assert_eq!(
            JsonParseNode::new(&payload).untyped_value().unwrap(),
            Value::String("2024-01-01T00:00:00Z".into())
        );
    }

    #[test]
    fn missing_child_is_none() {
        let payload = json!({ "a": null });
        let node = JsonParseNode::new(&payload);
        assert!(node.child_node("b").is_none());
        assert!(node.child_node("a").unwrap().is_null());
    }
}
