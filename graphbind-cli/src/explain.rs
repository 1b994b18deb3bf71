//! Enum codec explanations for the `graphbind explain-enum` command.

use graphbind_core::{EnumCodec, Multiplicity};
use graphbind_types::enum_codecs;

/// Find a codec by wire name, ignoring case and `-`/`_` separators.
pub fn lookup_codec(query: &str) -> Option<&'static EnumCodec> {
    let normalized = normalize(query);
    enum_codecs()
        .iter()
        .copied()
        .find(|codec| normalize(codec.name()) == normalized)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn list_codec_names() -> Vec<&'static str> {
    enum_codecs().iter().map(|codec| codec.name()).collect()
}

pub fn format_multiplicity(multiplicity: Multiplicity) -> &'static str {
    match multiplicity {
        Multiplicity::Single => "Single",
        Multiplicity::Flags => "Flags",
    }
}

/// What decoding does with a member this build does not know.
pub fn unknown_value_policy(codec: &EnumCodec) -> String {
    match (codec.sentinel(), codec.multiplicity()) {
        (Some(sentinel), Multiplicity::Single) => {
            format!("Unrecognized values decode to `{sentinel}`.")
        }
        (Some(sentinel), Multiplicity::Flags) => {
            format!("Unrecognized members set the `{sentinel}` flag; known members are kept.")
        }
        (None, Multiplicity::Single) => {
            "Unrecognized values leave the property unset; decoding does not fail.".to_string()
        }
        (None, Multiplicity::Flags) => {
            "Any unrecognized member leaves the property unset; decoding does not fail."
                .to_string()
        }
    }
}
