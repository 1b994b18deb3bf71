//! BDD harness (cucumber-rs).
//!
//! The world decodes payloads through the JSON binding and keeps whatever the scenario
//! inspects next. Step definitions live in `tests/cucumber.rs`.

use anyhow::Context;
use cucumber::World;
use graphbind_core::{DecodeError, Record};
use graphbind_types::{Family, family};
use serde_json::Value as JsonValue;

#[derive(Debug, Default, World)]
pub struct GraphbindWorld {
    pub payload: Option<String>,
    pub record: Option<Record>,
    pub error: Option<DecodeError>,
    pub written: Option<JsonValue>,
}

impl GraphbindWorld {
    pub fn family(name: &str) -> anyhow::Result<&'static Family> {
        family(name).with_context(|| format!("no family named {name}"))
    }

    /// Decode the current payload as `family_name`, keeping either the record or the error.
    pub fn decode_as(&mut self, family_name: &str) -> anyhow::Result<()> {
        let family = Self::family(family_name)?;
        let payload = self.payload.as_deref().context("no payload given")?;
        match graphbind_json::record_from_str(payload, family.factory) {
            Ok(record) => {
                self.record = Some(record);
                self.error = None;
            }
            Err(e) => {
                self.record = None;
                self.error = Some(e);
            }
        }
        Ok(())
    }

    pub fn record(&self) -> anyhow::Result<&Record> {
        self.record.as_ref().context("no record decoded")
    }

    pub fn record_mut(&mut self) -> anyhow::Result<&mut Record> {
        self.record.as_mut().context("no record decoded")
    }

    pub fn serialize(&mut self) -> anyhow::Result<&JsonValue> {
        let written = graphbind_json::to_value(self.record()?).context("serialize record")?;
        Ok(self.written.insert(written))
    }

    pub fn written(&self) -> anyhow::Result<&JsonValue> {
        self.written.as_ref().context("nothing serialized")
    }
}
