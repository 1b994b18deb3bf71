use graphbind_core::{EncodeError, EncodeResult, Serializable, SerializationWriter};
use serde_json::{Map, Number, Value as JsonValue};

#[derive(Debug)]
enum Frame {
    Object {
        key: Option<String>,
        members: Map<String, JsonValue>,
    },
    Array {
        key: Option<String>,
        items: Vec<JsonValue>,
    },
}

/// [`SerializationWriter`] building a `serde_json` tree.
///
/// Objects and arrays are assembled on a frame stack; the finished tree is taken with
/// [`JsonSerializationWriter::into_value`].
#[derive(Debug, Default)]
pub struct JsonSerializationWriter {
    frames: Vec<Frame>,
    root: Option<JsonValue>,
}

impl JsonSerializationWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, key: Option<&str>, value: JsonValue) -> EncodeResult<()> {
        match self.frames.last_mut() {
            Some(Frame::Object { members, .. }) => {
                let key = key.ok_or(EncodeError::MissingKey)?;
                members.insert(key.to_string(), value);
            }
            Some(Frame::Array { items, .. }) => items.push(value),
            None if self.root.is_some() => {
                return Err(EncodeError::UnbalancedFrames {
                    message: "more than one root value".to_string(),
                });
            }
            None => self.root = Some(value),
        }
        Ok(())
    }

    /// The written tree. Fails when frames are still open or nothing was written.
    pub fn into_value(self) -> EncodeResult<JsonValue> {
        if !self.frames.is_empty() {
            return Err(EncodeError::UnbalancedFrames {
                message: format!("{} frame(s) left open", self.frames.len()),
            });
        }
        self.root.ok_or_else(|| EncodeError::UnbalancedFrames {
            message: "nothing was written".to_string(),
        })
    }
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_string_value(&mut self, key: Option<&str>, value: Option<&str>) -> EncodeResult<()> {
        match value {
            Some(value) => self.emit(key, JsonValue::String(value.to_string())),
            None => Ok(()),
        }
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: Option<bool>) -> EncodeResult<()> {
        match value {
            Some(value) => self.emit(key, JsonValue::Bool(value)),
            None => Ok(()),
        }
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: Option<i64>) -> EncodeResult<()> {
        match value {
            Some(value) => self.emit(key, JsonValue::Number(value.into())),
            None => Ok(()),
        }
    }

    fn write_u64_value(&mut self, key: Option<&str>, value: Option<u64>) -> EncodeResult<()> {
        match value {
            Some(value) => self.emit(key, JsonValue::Number(value.into())),
            None => Ok(()),
        }
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: Option<f64>) -> EncodeResult<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let number = Number::from_f64(value).ok_or(EncodeError::NonFiniteNumber { value })?;
        self.emit(key, JsonValue::Number(number))
    }

    fn write_null_value(&mut self, key: Option<&str>) -> EncodeResult<()> {
        self.emit(key, JsonValue::Null)
    }

    fn start_object(&mut self, key: Option<&str>) -> EncodeResult<()> {
        self.frames.push(Frame::Object {
            key: key.map(str::to_string),
            members: Map::new(),
        });
        Ok(())
    }

    fn end_object(&mut self) -> EncodeResult<()> {
        match self.frames.pop() {
            Some(Frame::Object { key, members }) => self.emit(key.as_deref(), JsonValue::Object(members)),
            Some(frame @ Frame::Array { .. }) => {
                self.frames.push(frame);
                Err(EncodeError::UnbalancedFrames {
                    message: "end_object while an array is open".to_string(),
                })
            }
            None => Err(EncodeError::UnbalancedFrames {
                message: "end_object without start_object".to_string(),
            }),
        }
    }

    fn start_array(&mut self, key: Option<&str>) -> EncodeResult<()> {
        self.frames.push(Frame::Array {
            key: key.map(str::to_string),
            items: Vec::new(),
        });
        Ok(())
    }

    fn end_array(&mut self) -> EncodeResult<()> {
        match self.frames.pop() {
            Some(Frame::Array { key, items }) => self.emit(key.as_deref(), JsonValue::Array(items)),
            Some(frame @ Frame::Object { .. }) => {
                self.frames.push(frame);
                Err(EncodeError::UnbalancedFrames {
                    message: "end_array while an object is open".to_string(),
                })
            }
            None => Err(EncodeError::UnbalancedFrames {
                message: "end_array without start_array".to_string(),
            }),
        }
    }

    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: &dyn Serializable,
    ) -> EncodeResult<()> {
        self.start_object(key)?;
        value.serialize(self)?;
        self.end_object()
    }
}
