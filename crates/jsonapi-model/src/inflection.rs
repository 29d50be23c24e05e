use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Rewriting applied to field names between the schema and the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldInflection {
    /// Names are used verbatim.
    #[default]
    None,
    /// `first_name` on the schema is `first-name` on the wire.
    Dasherize,
}

impl FieldInflection {
    /// Schema name to wire name.
    pub fn to_wire<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            FieldInflection::Dasherize if name.contains('_') => Cow::Owned(name.replace('_', "-")),
            _ => Cow::Borrowed(name),
        }
    }

    /// Wire name to schema name.
    pub fn from_wire<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            FieldInflection::Dasherize if name.contains('-') => Cow::Owned(name.replace('-', "_")),
            _ => Cow::Borrowed(name),
        }
    }
}
