//! Enum codecs: wire strings to ordinals and back.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

/// Whether an enum holds one member or a set of members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    /// Comma-separated member list on the wire, a bit set in memory.
    Flags,
}

impl Multiplicity {
    pub fn as_str(self) -> &'static str {
        match self {
            Multiplicity::Single => "single",
            Multiplicity::Flags => "flags",
        }
    }
}

/// Bidirectional table between an enum's wire strings and their ordinals.
///
/// Ordinals are member positions in declaration order. A codec may name one member as its
/// sentinel; unrecognized strings decode to that member instead of being dropped.
#[derive(Debug)]
pub struct EnumCodec {
    name: &'static str,
    members: &'static [&'static str],
    sentinel: Option<usize>,
    multiplicity: Multiplicity,
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

impl EnumCodec {
    pub const fn single(name: &'static str, members: &'static [&'static str]) -> Self {
        Self {
            name,
            members,
            sentinel: None,
            multiplicity: Multiplicity::Single,
        }
    }

    /// Codec for a comma-separated set of members, one bit per member.
    ///
    /// # Panics
    ///
    /// Panics when given more than 64 members. In a `static` this fails const evaluation.
    pub const fn flags(name: &'static str, members: &'static [&'static str]) -> Self {
        assert!(members.len() <= 64, "flags codecs support at most 64 members");
        Self {
            name,
            members,
            sentinel: None,
            multiplicity: Multiplicity::Flags,
        }
    }

    /// Name the member unrecognized strings decode to.
    ///
    /// # Panics
    ///
    /// Panics when `wire` is not a member. In a `static` this fails const evaluation.
    pub const fn with_sentinel(self, wire: &'static str) -> Self {
        let mut i = 0;
        while i < self.members.len() {
            if str_eq(self.members[i], wire) {
                return Self {
                    sentinel: Some(i),
                    ..self
                };
            }
            i += 1;
        }
        panic!("sentinel must be one of the codec members");
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn members(&self) -> &'static [&'static str] {
        self.members
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Wire string of the sentinel member, if the codec has one.
    pub fn sentinel(&self) -> Option<&'static str> {
        self.sentinel.map(|ordinal| self.members[ordinal])
    }

    pub fn member(&self, ordinal: usize) -> Option<&'static str> {
        self.members.get(ordinal).copied()
    }

    /// Exact (case-sensitive) lookup of a wire string.
    pub fn ordinal_of(&self, wire: &str) -> Option<usize> {
        self.members.iter().position(|member| *member == wire)
    }

    /// Value holding the member at `ordinal`. For flags codecs this is a one-member set.
    pub fn value(&'static self, ordinal: usize) -> Option<EnumValue> {
        if ordinal >= self.members.len() {
            return None;
        }
        let raw = match self.multiplicity {
            Multiplicity::Single => ordinal as u64,
            Multiplicity::Flags => 1 << ordinal,
        };
        Some(EnumValue { codec: self, raw })
    }

    /// Set of members for a flags codec. Returns `None` for single codecs or unknown ordinals.
    pub fn flags_value(&'static self, ordinals: &[usize]) -> Option<EnumValue> {
        if self.multiplicity != Multiplicity::Flags {
            return None;
        }
        let mut raw = 0u64;
        for &ordinal in ordinals {
            if ordinal >= self.members.len() {
                return None;
            }
            raw |= 1 << ordinal;
        }
        Some(EnumValue { codec: self, raw })
    }

    /// Decode a wire string.
    ///
    /// Unrecognized strings map to the sentinel when the codec has one and yield `None`
    /// otherwise. `None` means "no value", not a failure.
    pub fn decode(&'static self, raw: &str) -> Option<EnumValue> {
        match self.multiplicity {
            Multiplicity::Single => {
                let ordinal = self.ordinal_of(raw).or_else(|| self.unrecognized(raw))?;
                self.value(ordinal)
            }
            Multiplicity::Flags => {
                let mut bits = 0u64;
                for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let ordinal = self.ordinal_of(part).or_else(|| self.unrecognized(part))?;
                    bits |= 1 << ordinal;
                }
                (bits != 0).then_some(EnumValue {
                    codec: self,
                    raw: bits,
                })
            }
        }
    }

    fn unrecognized(&self, raw: &str) -> Option<usize> {
        match self.sentinel {
            Some(ordinal) => {
                debug!(codec = self.name, value = raw, "unrecognized enum member mapped to sentinel");
                Some(ordinal)
            }
            None => {
                debug!(codec = self.name, value = raw, "unrecognized enum member has no sentinel");
                None
            }
        }
    }

    /// Wire string for `value`. Flags are joined with commas in declaration order.
    pub fn encode(&self, value: &EnumValue) -> String {
        match self.multiplicity {
            Multiplicity::Single => self
                .member(value.raw as usize)
                .unwrap_or_default()
                .to_string(),
            Multiplicity::Flags => self
                .members
                .iter()
                .enumerate()
                .filter(|(ordinal, _)| value.raw & (1 << ordinal) != 0)
                .map(|(_, member)| *member)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// A decoded enum value bound to its codec.
#[derive(Clone, Copy)]
pub struct EnumValue {
    codec: &'static EnumCodec,
    raw: u64,
}

impl EnumValue {
    pub fn codec(&self) -> &'static EnumCodec {
        self.codec
    }

    /// Member ordinal of a single-valued enum.
    pub fn ordinal(&self) -> Option<usize> {
        match self.codec.multiplicity {
            Multiplicity::Single => Some(self.raw as usize),
            Multiplicity::Flags => None,
        }
    }

    /// Member ordinals in declaration order. One element for single-valued enums.
    pub fn ordinals(&self) -> Vec<usize> {
        match self.codec.multiplicity {
            Multiplicity::Single => vec![self.raw as usize],
            Multiplicity::Flags => (0..self.codec.members.len())
                .filter(|ordinal| self.raw & (1 << ordinal) != 0)
                .collect(),
        }
    }

    pub fn contains(&self, ordinal: usize) -> bool {
        self.ordinals().contains(&ordinal)
    }

    pub fn is_sentinel(&self) -> bool {
        self.codec
            .sentinel
            .is_some_and(|sentinel| self.contains(sentinel))
    }

    pub fn to_wire_string(&self) -> String {
        self.codec.encode(self)
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.codec.name == other.codec.name && self.raw == other.raw
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.codec.name.hash(state);
        self.raw.hash(state);
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.codec.name, self.to_wire_string())
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

/// A Rust enum bound to an [`EnumCodec`]. Variant order must match the codec's members.
pub trait WireEnum: Copy + Sized + 'static {
    fn codec() -> &'static EnumCodec;

    fn ordinal(self) -> usize;

    fn from_ordinal(ordinal: usize) -> Option<Self>;

    /// Decode through the codec, including its sentinel policy.
    fn parse(raw: &str) -> Option<Self> {
        Self::codec()
            .decode(raw)
            .and_then(|value| value.ordinal())
            .and_then(Self::from_ordinal)
    }

    fn as_wire_str(self) -> &'static str {
        Self::codec().member(self.ordinal()).unwrap_or_default()
    }

    fn to_enum_value(self) -> Option<EnumValue> {
        Self::codec().value(self.ordinal())
    }

    /// Typed view of a stored value. `None` when it belongs to another codec.
    fn from_enum_value(value: &EnumValue) -> Option<Self> {
        if value.codec().name() != Self::codec().name() {
            return None;
        }
        value.ordinal().and_then(Self::from_ordinal)
    }
}

/// Declare a fieldless enum together with its codec static and [`WireEnum`] impl.
///
/// ```
/// graphbind_core::wire_enum! {
///     pub enum Direction: DIRECTION = single("mediaStreamDirection") {
///         CallerToCallee => "callerToCallee",
///         CalleeToCaller => "calleeToCaller",
///     }
/// }
///
/// use graphbind_core::WireEnum;
/// assert_eq!(Direction::parse("calleeToCaller"), Some(Direction::CalleeToCaller));
/// assert_eq!(Direction::parse("sideways"), None);
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $codec:ident = $kind:ident ( $wire_name:literal ) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
        $( sentinel = $sentinel:literal ; )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        $vis static $codec: $crate::EnumCodec =
            $crate::EnumCodec::$kind($wire_name, &[$($wire),+]) $( .with_sentinel($sentinel) )?;

        impl $crate::WireEnum for $name {
            fn codec() -> &'static $crate::EnumCodec {
                &$codec
            }

            fn ordinal(self) -> usize {
                self as usize
            }

            fn from_ordinal(ordinal: usize) -> Option<Self> {
                const VARIANTS: &[$name] = &[$($name::$variant),+];
                VARIANTS.get(ordinal).copied()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static STATUS: EnumCodec =
        EnumCodec::single("status", &["active", "retired", "unknownFutureValue"])
            .with_sentinel("unknownFutureValue");

    static DIRECTION: EnumCodec = EnumCodec::single("direction", &["inbound", "outbound"]);

    static MODES: EnumCodec = EnumCodec::flags(
        "modes",
        &["audio", "video", "screenSharing", "unknownFutureValue"],
    )
    .with_sentinel("unknownFutureValue");

    static STRICT_MODES: EnumCodec = EnumCodec::flags("strictModes", &["read", "write"]);

    #[test]
    fn known_member_decodes_to_its_ordinal() {
        let value = STATUS.decode("retired").unwrap();
        assert_eq!(value.ordinal(), Some(1));
        assert_eq!(STATUS.encode(&value), "retired");
    }

    #[test]
    fn unknown_member_maps_to_sentinel() {
        let value = STATUS.decode("totallyNewStatus").unwrap();
        assert!(value.is_sentinel());
        assert_eq!(value.to_wire_string(), "unknownFutureValue");
    }

    #[test]
    fn unknown_member_without_sentinel_is_no_value() {
        assert_eq!(DIRECTION.decode("sideways"), None);
        assert_eq!(DIRECTION.sentinel(), None);
    }

    #[test]
    fn decode_is_case_sensitive() {
        assert_eq!(DIRECTION.decode("Inbound"), None);
    }

    #[test]
    fn flags_round_trip_in_declaration_order() {
        let value = MODES.decode("screenSharing, audio").unwrap();
        assert_eq!(value.ordinals(), vec![0, 2]);
        assert_eq!(MODES.encode(&value), "audio,screenSharing");
    }

    #[test]
    fn flags_unknown_member_sets_sentinel_bit() {
        let value = MODES.decode("audio,hologram").unwrap();
        assert!(value.contains(0));
        assert!(value.is_sentinel());
        assert_eq!(value.to_wire_string(), "audio,unknownFutureValue");
    }

    #[test]
    fn flags_unknown_member_without_sentinel_is_no_value() {
        assert_eq!(STRICT_MODES.decode("read,execute"), None);
        assert_eq!(STRICT_MODES.decode(""), None);
    }

    #[test]
    fn values_from_different_codecs_are_not_equal() {
        let a = DIRECTION.value(0).unwrap();
        let b = STATUS.value(0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn value_rejects_out_of_range_ordinal() {
        assert!(DIRECTION.value(2).is_none());
        assert!(MODES.flags_value(&[0, 9]).is_none());
        assert!(DIRECTION.flags_value(&[0]).is_none());
    }

    crate::wire_enum! {
        enum Status: TYPED_STATUS = single("typedStatus") {
            Active => "active",
            Retired => "retired",
            UnknownFutureValue => "unknownFutureValue",
        }
        sentinel = "unknownFutureValue";
    }

    #[test]
    fn wire_enum_binds_variants_to_codec() {
        assert_eq!(Status::parse("active"), Some(Status::Active));
        assert_eq!(Status::parse("brandNew"), Some(Status::UnknownFutureValue));
        assert_eq!(Status::Retired.as_wire_str(), "retired");
        assert_eq!(TYPED_STATUS.sentinel(), Some("unknownFutureValue"));

        let stored = Status::Retired.to_enum_value().unwrap();
        assert_eq!(Status::from_enum_value(&stored), Some(Status::Retired));
        assert_eq!(Status::from_enum_value(&STATUS.value(1).unwrap()), None);
    }

    #[test]
    #[should_panic(expected = "sentinel must be one of the codec members")]
    fn sentinel_outside_members_panics() {
        let _ = EnumCodec::single("status", &["active"]).with_sentinel("gone");
    }

    #[test]
    #[should_panic(expected = "at most 64 members")]
    fn flags_beyond_64_members_panic() {
        static MANY: [&str; 65] = ["member"; 65];
        let _ = EnumCodec::flags("many", &MANY);
    }
}
