//! Static schema descriptors.
//!
//! A schema lists the properties a record type declares, in serialization order, and points at
//! its base schema. Derived schemas only list their own fields; the base's fields are inherited
//! by table composition.

use std::fmt;

use crate::enums::EnumCodec;
use crate::error::DecodeResult;
use crate::ports::ParseNode;
use crate::record::Record;

/// Builds the (still empty) record for a payload, choosing the variant from the payload's
/// discriminator where the schema is polymorphic.
pub type RecordFactory = fn(&dyn ParseNode) -> DecodeResult<Record>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    DateTime,
    Date,
    TimeOfDay,
    Uuid,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::DateTime => "date-time",
            ScalarKind::Date => "date",
            ScalarKind::TimeOfDay => "time-of-day",
            ScalarKind::Uuid => "uuid",
        }
    }
}

#[derive(Clone, Copy)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(&'static EnumCodec),
    Object(RecordFactory),
    ScalarCollection(ScalarKind),
    EnumCollection(&'static EnumCodec),
    ObjectCollection(RecordFactory),
    /// Any JSON value, kept as-is.
    Untyped,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Scalar(kind) => kind.name(),
            FieldKind::Enum(_) => "enum",
            FieldKind::Object(_) => "object",
            FieldKind::ScalarCollection(_) => "scalar collection",
            FieldKind::EnumCollection(_) => "enum collection",
            FieldKind::ObjectCollection(_) => "object collection",
            FieldKind::Untyped => "untyped",
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            FieldKind::ScalarCollection(_)
                | FieldKind::EnumCollection(_)
                | FieldKind::ObjectCollection(_)
        )
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => write!(f, "Scalar({})", kind.name()),
            FieldKind::Enum(codec) => write!(f, "Enum({})", codec.name()),
            FieldKind::Object(_) => f.write_str("Object"),
            FieldKind::ScalarCollection(kind) => write!(f, "ScalarCollection({})", kind.name()),
            FieldKind::EnumCollection(codec) => write!(f, "EnumCollection({})", codec.name()),
            FieldKind::ObjectCollection(_) => f.write_str("ObjectCollection"),
            FieldKind::Untyped => f.write_str("Untyped"),
        }
    }
}

/// One declared property: wire name plus kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    pub const fn string(name: &'static str) -> Self {
        Self::scalar(name, ScalarKind::String)
    }

    pub const fn enumeration(name: &'static str, codec: &'static EnumCodec) -> Self {
        Self::new(name, FieldKind::Enum(codec))
    }

    pub const fn object(name: &'static str, factory: RecordFactory) -> Self {
        Self::new(name, FieldKind::Object(factory))
    }

    pub const fn scalars(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::ScalarCollection(kind))
    }

    pub const fn enums(name: &'static str, codec: &'static EnumCodec) -> Self {
        Self::new(name, FieldKind::EnumCollection(codec))
    }

    pub const fn objects(name: &'static str, factory: RecordFactory) -> Self {
        Self::new(name, FieldKind::ObjectCollection(factory))
    }

    pub const fn untyped(name: &'static str) -> Self {
        Self::new(name, FieldKind::Untyped)
    }
}

/// Descriptor of one record type.
///
/// Schemas are identified by `name`; two descriptors with the same name are the same type.
pub struct Schema {
    pub name: &'static str,
    /// Discriminator value written into records built in code, e.g.
    /// `#microsoft.graph.security.host`.
    pub discriminator: Option<&'static str>,
    pub base: Option<&'static Schema>,
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Base-most schema first, `self` last.
    pub fn lineage(&'static self) -> Vec<&'static Schema> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(base) = current.base {
            chain.push(base);
            current = base;
        }
        chain.reverse();
        chain
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_a(&self, other: &Schema) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if schema.name == other.name {
                return true;
            }
            current = schema.base;
        }
        false
    }

    /// Declared field named `name`, searching own fields before the base's.
    pub fn field(&'static self, name: &str) -> Option<&'static FieldDef> {
        let mut current = Some(self);
        while let Some(schema) = current {
            if let Some(field) = schema.fields.iter().find(|field| field.name == name) {
                return Some(field);
            }
            current = schema.base;
        }
        None
    }

    pub fn declares(&'static self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Every declared field in serialization order: base fields first.
    pub fn all_fields(&'static self) -> Vec<&'static FieldDef> {
        self.lineage()
            .into_iter()
            .flat_map(|schema| schema.fields.iter())
            .collect()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("discriminator", &self.discriminator)
            .field("base", &self.base.map(|base| base.name))
            .field(
                "fields",
                &self.fields.iter().map(|field| field.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static ROOT: Schema = Schema {
        name: "root",
        discriminator: None,
        base: None,
        fields: &[FieldDef::string("id"), FieldDef::string("@odata.type")],
    };

    static CHILD: Schema = Schema {
        name: "child",
        discriminator: Some("#test.child"),
        base: Some(&ROOT),
        fields: &[
            FieldDef::string("label"),
            FieldDef::scalar("count", ScalarKind::Int32),
        ],
    };

    static GRANDCHILD: Schema = Schema {
        name: "grandchild",
        discriminator: Some("#test.grandchild"),
        base: Some(&CHILD),
        fields: &[FieldDef::untyped("extra")],
    };

    #[test]
    fn lineage_is_base_first() {
        let names: Vec<_> = GRANDCHILD.lineage().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["root", "child", "grandchild"]);
    }

    #[test]
    fn all_fields_extend_base_table() {
        let names: Vec<_> = GRANDCHILD.all_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "@odata.type", "label", "count", "extra"]);
    }

    #[test]
    fn is_a_walks_the_base_chain() {
        assert!(GRANDCHILD.is_a(&ROOT));
        assert!(CHILD.is_a(&CHILD));
        assert!(!ROOT.is_a(&CHILD));
    }

    #[test]
    fn base_does_not_declare_derived_fields() {
        assert!(CHILD.declares("id"));
        assert!(!ROOT.declares("label"));
        assert_eq!(
            CHILD.field("count").map(|f| f.kind.label()),
            Some("int32")
        );
    }
}
