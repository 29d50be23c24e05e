//! Structured view of JSON:API query parameters.
//!
//! Parameters are only parsed here; applying `include`, `fields`, `sort` or
//! `filter` to a data store is up to the caller.

use std::collections::BTreeMap;

use jsonapi_model::{ErrorList, ErrorObject, Problem};

use crate::urls::{percent_decode, query_of};

/// Query key carrying the sort specification.
pub const ORDERING_PARAM: &str = "sort";

/// Query key carrying the include paths.
pub const INCLUDE_PARAM: &str = "include";

/// Query key selecting an explicit output format.
pub const FORMAT_PARAM: &str = "format";

/// One `sort` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name (dotted for relationship paths).
    pub field: String,
    /// `-field` sorts descending.
    pub descending: bool,
}

/// Parsed query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    /// Relationship paths from `include`, each split on `.`.
    pub include: Vec<Vec<String>>,
    /// Sparse fieldsets from `fields[TYPE]`.
    pub fields: BTreeMap<String, Vec<String>>,
    /// Sort criteria from `sort`, in priority order.
    pub sort: Vec<SortField>,
    /// Raw `filter[...]` values by inner key.
    pub filter: BTreeMap<String, String>,
    /// Raw `page[...]` values by inner key.
    pub page: BTreeMap<String, String>,
    /// Explicit format from `format`.
    pub format: Option<String>,
    /// Any other parameter.
    pub other: BTreeMap<String, String>,
    params: Vec<(String, String)>,
}

impl RequestQuery {
    /// Parses a raw query string (without `?`).
    ///
    /// Every malformed parameter is reported; the error list carries one
    /// `InvalidParameter` entry per offending parameter.
    pub fn parse(query: &str) -> Result<Self, ErrorList> {
        let mut parsed = RequestQuery::default();
        let mut errors: Vec<ErrorObject> = Vec::new();

        for raw in query.split('&').filter(|raw| !raw.is_empty()) {
            let (raw_key, raw_value) = raw.split_once('=').unwrap_or((raw, ""));
            let key = percent_decode(raw_key);
            let value = percent_decode(raw_value);
            parsed.params.push((key.clone(), value.clone()));

            if key == INCLUDE_PARAM {
                match parse_include(&value) {
                    Some(paths) => parsed.include.extend(paths),
                    None => errors.push(Problem::InvalidParameter.at_parameter(
                        &key,
                        "include paths must be non-empty, dot-separated relationship names",
                    )),
                }
            } else if key == ORDERING_PARAM {
                match parse_sort(&value) {
                    Some(fields) => parsed.sort.extend(fields),
                    None => errors.push(
                        Problem::InvalidParameter
                            .at_parameter(&key, "sort fields must be non-empty"),
                    ),
                }
            } else if key == FORMAT_PARAM {
                parsed.format = Some(value);
            } else if let Some((family, inner)) = bracketed(&key) {
                match family {
                    "fields" => match parse_list(&value) {
                        Some(names) => {
                            parsed.fields.insert(inner.to_string(), names);
                        }
                        None => errors.push(
                            Problem::InvalidParameter
                                .at_parameter(&key, "sparse fieldsets must list field names"),
                        ),
                    },
                    "filter" => {
                        parsed.filter.insert(inner.to_string(), value);
                    }
                    "page" => {
                        parsed.page.insert(inner.to_string(), value);
                    }
                    _ => {
                        parsed.other.insert(key, value);
                    }
                }
            } else {
                parsed.other.insert(key, value);
            }
        }

        match ErrorList::from_vec(errors) {
            Ok(errors) => Err(errors),
            // nothing collected
            Err(_) => Ok(parsed),
        }
    }

    /// Parses the query string of a full URL.
    pub fn from_url(url: &str) -> Result<Self, ErrorList> {
        Self::parse(query_of(url))
    }

    /// First decoded value of a parameter by its full key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn bracketed(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let (family, inner) = inner.split_once('[')?;
    if family.is_empty() || inner.is_empty() {
        return None;
    }
    Some((family, inner))
}

fn parse_list(value: &str) -> Option<Vec<String>> {
    let names: Vec<String> = value.split(',').map(|s| s.trim().to_string()).collect();
    if names.iter().any(String::is_empty) {
        return None;
    }
    Some(names)
}

fn parse_include(value: &str) -> Option<Vec<Vec<String>>> {
    parse_list(value)?
        .into_iter()
        .map(|path| {
            let segments: Vec<String> = path.split('.').map(str::to_string).collect();
            if segments.iter().any(String::is_empty) {
                None
            } else {
                Some(segments)
            }
        })
        .collect()
}

fn parse_sort(value: &str) -> Option<Vec<SortField>> {
    parse_list(value)?
        .into_iter()
        .map(|entry| {
            let (field, descending) = match entry.strip_prefix('-') {
                Some(field) => (field.to_string(), true),
                None => (entry, false),
            };
            if field.is_empty() {
                None
            } else {
                Some(SortField { field, descending })
            }
        })
        .collect()
}
