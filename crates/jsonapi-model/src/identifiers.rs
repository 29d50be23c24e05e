use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Minimal `{type, id}` reference to a resource.
///
/// Two identifiers are equal iff both members match exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Resource type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Opaque identifier supplied by the persistence layer.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates an identifier from a type name and id.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.id)
    }
}

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses a validated name from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                let s = value.into();
                let re = PATTERN.get_or_init(|| Regex::new($pattern).expect("invalid regex"));
                if !re.is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    MemberName,
    "JSON:API member name: globally allowed characters, with `-`, `_` and space permitted only in the interior.",
    r"^[A-Za-z0-9\x{80}-\x{10FFFF}](?:[A-Za-z0-9\x{80}-\x{10FFFF}_ -]*[A-Za-z0-9\x{80}-\x{10FFFF}])?$"
);
newtype!(
    TypeName,
    "Resource type name; follows the same character rules as member names.",
    r"^[A-Za-z0-9\x{80}-\x{10FFFF}](?:[A-Za-z0-9\x{80}-\x{10FFFF}_ -]*[A-Za-z0-9\x{80}-\x{10FFFF}])?$"
);
