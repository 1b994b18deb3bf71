//! Fatal faults: broken invariants between a schema and the values stored against it.

use graphbind_store::StoreError;

use crate::schema::Schema;
use crate::value::Value;

#[track_caller]
pub(crate) fn schema_mismatch(schema: &Schema, field: &str, expected: &str, found: &Value) -> ! {
    panic!(
        "schema mismatch: {}.{field} expected {expected}, found {}",
        schema.name,
        found.kind()
    )
}

#[track_caller]
pub(crate) fn rejected_key(field: &str, err: StoreError) -> ! {
    panic!("backing store rejected property `{field}`: {err}")
}

#[track_caller]
pub(crate) fn wrong_model(expected: &Schema, found: &Schema) -> ! {
    panic!(
        "record of type {} cannot be viewed as {}",
        found.name, expected.name
    )
}
