//! Media types and `Accept` header parsing.

use std::cmp::Reverse;
use std::fmt;

use jsonapi_model::{ValidationError, JSONAPI_MEDIA_TYPE};

/// Parameters a JSON:API media type may carry. JSON:API 1.0 allows none;
/// `ext` and `profile` follow the 1.1 media type rules.
const JSONAPI_PARAMS: [&str; 2] = ["ext", "profile"];

/// A parsed media type or media range (`type/subtype; key=value`).
///
/// Type, subtype and parameter names are case-insensitive and stored
/// lowercase. Parameter values keep their case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    kind: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Media type without parameters. Names are lowercased.
    pub fn new(kind: &str, subtype: &str) -> Self {
        Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params: Vec::new(),
        }
    }

    /// `application/vnd.api+json`.
    pub fn jsonapi() -> Self {
        Self::new("application", "vnd.api+json")
    }

    /// Parses a media type. `*/*` and `type/*` ranges are accepted.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::PatternMismatch {
            field: "media type",
            value: raw.to_string(),
        };

        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        let (kind, subtype) = (kind.trim().to_ascii_lowercase(), subtype.trim().to_ascii_lowercase());
        if !is_token(&kind) || !is_token(&subtype) || (kind == "*" && subtype != "*") {
            return Err(invalid());
        }

        let mut params = Vec::new();
        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (name, value) = part.split_once('=').ok_or_else(invalid)?;
            let name = name.trim().to_ascii_lowercase();
            if !is_token(&name) {
                return Err(invalid());
            }
            params.push((name, value.trim().trim_matches('"').to_string()));
        }

        Ok(Self {
            kind,
            subtype,
            params,
        })
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.kind, self.subtype)
    }

    /// Value of a parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All parameters in header order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// True if this range covers `other` (parameters are not compared).
    pub fn matches(&self, other: &MediaType) -> bool {
        (self.kind == "*" || self.kind == other.kind)
            && (self.subtype == "*" || self.subtype == other.subtype)
    }

    /// True for `*/*` and `type/*`.
    pub fn is_wildcard(&self) -> bool {
        self.kind == "*" || self.subtype == "*"
    }

    /// Precedence among ranges of equal quality.
    pub fn specificity(&self) -> u8 {
        match (self.kind.as_str(), self.subtype.as_str()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ if self.params.is_empty() => 2,
            _ => 3,
        }
    }

    /// True for `application/vnd.api+json`.
    pub fn is_jsonapi(&self) -> bool {
        self.essence() == JSONAPI_MEDIA_TYPE
    }

    /// False for a JSON:API media type carrying parameters other than
    /// `ext` or `profile`; such types must be ignored or refused.
    pub fn has_valid_jsonapi_params(&self) -> bool {
        !self.is_jsonapi()
            || self
                .params
                .iter()
                .all(|(name, _)| JSONAPI_PARAMS.contains(&name.as_str()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}

/// One media range of an `Accept` header with its quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptEntry {
    /// Media range, `q` removed.
    pub range: MediaType,
    /// Quality in thousandths (`q=0.5` is 500).
    pub quality: u16,
}

/// Parses an `Accept` header into ranges ordered by quality, then
/// specificity, then header position.
///
/// Unparseable ranges, `q=0` ranges and JSON:API ranges with foreign
/// parameters are dropped.
pub fn parse_accept(header: &str) -> Vec<AcceptEntry> {
    let mut entries: Vec<AcceptEntry> = header
        .split(',')
        .filter(|raw| !raw.trim().is_empty())
        .filter_map(|raw| MediaType::parse(raw).ok())
        .filter_map(|mut range| {
            let quality = match range.params.iter().position(|(name, _)| name == "q") {
                Some(index) => parse_quality(&range.params.remove(index).1)?,
                None => 1000,
            };
            Some(AcceptEntry { range, quality })
        })
        .filter(|entry| entry.quality > 0 && entry.range.has_valid_jsonapi_params())
        .collect();
    // stable: equal keys keep header order
    entries.sort_by_key(|entry| (Reverse(entry.quality), Reverse(entry.range.specificity())));
    entries
}

fn parse_quality(raw: &str) -> Option<u16> {
    let value: f32 = raw.parse().ok()?;
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    Some((value * 1000.0).round() as u16)
}

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+*".contains(c))
}
