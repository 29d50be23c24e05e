//! Page-window metadata and navigation links.
//!
//! Two strategies are supported: page number/size (the default JSON:API
//! profile) and limit/offset. Both are pure functions of the request URL,
//! the requested window and the total item count.

use jsonapi_model::{Document, ErrorList, Link, Problem, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::RequestQuery;
use crate::urls::{remove_query_param, replace_query_param};

/// Pagination parameter names and limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Query key of the page number.
    pub number_param: String,
    /// Query key of the page size.
    pub size_param: String,
    /// Query key of the offset.
    pub offset_param: String,
    /// Query key of the limit.
    pub limit_param: String,
    /// Page size used when the request names none.
    pub default_size: u64,
    /// Upper bound for requested sizes; larger requests are clamped.
    pub max_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            number_param: "page[number]".to_string(),
            size_param: "page[size]".to_string(),
            offset_param: "page[offset]".to_string(),
            limit_param: "page[limit]".to_string(),
            default_size: 20,
            max_size: 100,
        }
    }
}

/// Requested page by number and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    number: u64,
    size: u64,
}

impl PageSpec {
    /// Creates a page spec; `number >= 1` and `size > 0`.
    pub fn new(number: u64, size: u64) -> Result<Self, ValidationError> {
        if number < 1 {
            return Err(ValidationError::OutOfBounds {
                field: "page number",
                value: number.to_string(),
            });
        }
        if size == 0 {
            return Err(ValidationError::OutOfBounds {
                field: "page size",
                value: size.to_string(),
            });
        }
        Ok(Self { number, size })
    }

    /// Reads the page window from request parameters, applying the default
    /// size and clamping to the configured maximum.
    pub fn from_query(query: &RequestQuery, config: &PaginationConfig) -> Result<Self, ErrorList> {
        let number = parse_param(query, &config.number_param, 1, 1)?;
        let size = parse_param(query, &config.size_param, config.default_size, 1)?;
        Ok(Self {
            number,
            size: size.min(config.max_size.max(1)),
        })
    }

    /// 1-based page number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Items per page.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Index of the first item of this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Requested window by offset and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSpec {
    offset: u64,
    limit: u64,
}

impl OffsetSpec {
    /// Creates an offset spec; `limit > 0`.
    pub fn new(offset: u64, limit: u64) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::OutOfBounds {
                field: "page limit",
                value: limit.to_string(),
            });
        }
        Ok(Self { offset, limit })
    }

    /// Reads the window from request parameters.
    pub fn from_query(query: &RequestQuery, config: &PaginationConfig) -> Result<Self, ErrorList> {
        let offset = parse_param(query, &config.offset_param, 0, 0)?;
        let limit = parse_param(query, &config.limit_param, config.default_size, 1)?;
        Ok(Self {
            offset,
            limit: limit.min(config.max_size.max(1)),
        })
    }

    /// Index of the first item.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of items.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Items on this page, in order.
    pub items: Vec<T>,
    /// Total items across all pages.
    pub total: u64,
    /// Window that produced this page.
    pub spec: PageSpec,
}

/// Navigation links and counts for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    /// First page.
    pub first: Option<String>,
    /// Last page.
    pub last: Option<String>,
    /// Previous page; absent on the first page.
    pub prev: Option<String>,
    /// Next page; absent on the last page.
    pub next: Option<String>,
    /// Total item count.
    pub total: u64,
    /// Number of pages.
    pub pages: u64,
}

impl PageLinks {
    /// Adds the links and `meta.total`/`meta.pages` to a document.
    pub fn apply(&self, mut document: Document) -> Document {
        let links = [
            ("first", &self.first),
            ("last", &self.last),
            ("prev", &self.prev),
            ("next", &self.next),
        ];
        for (name, href) in links {
            if let Some(href) = href {
                document = document.with_link(name, Link::Url(href.clone()));
            }
        }
        document
            .with_meta("total", Value::from(self.total))
            .with_meta("pages", Value::from(self.pages))
    }
}

/// Number of the last page: `ceil(total / size)`, 0 for an empty collection.
pub fn last_page(total: u64, size: u64) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(size)
}

/// Page-number links for `spec` over `total` items.
///
/// `first` and `last` always point at a page (page 1 when the collection is
/// empty). `prev` is omitted on page 1 and `next` on or past the last page.
pub fn compute_links(
    base_url: &str,
    spec: &PageSpec,
    total: u64,
    config: &PaginationConfig,
) -> PageLinks {
    let last = last_page(total, spec.size);
    let page_url = |number: u64| replace_query_param(base_url, &config.number_param, &number.to_string());

    PageLinks {
        first: Some(page_url(1)),
        last: Some(page_url(last.max(1))),
        prev: (spec.number > 1).then(|| page_url(spec.number - 1)),
        next: (spec.number < last).then(|| page_url(spec.number + 1)),
        total,
        pages: last,
    }
}

/// Limit/offset links for `spec` over `total` items.
///
/// `first` drops the offset parameter and `last` starts at the final full
/// window; both are omitted for an empty collection.
pub fn compute_offset_links(
    base_url: &str,
    spec: &OffsetSpec,
    total: u64,
    config: &PaginationConfig,
) -> PageLinks {
    let limit_url = replace_query_param(base_url, &config.limit_param, &spec.limit.to_string());
    let at_offset = |offset: u64| {
        if offset == 0 {
            remove_query_param(&limit_url, &config.offset_param)
        } else {
            replace_query_param(&limit_url, &config.offset_param, &offset.to_string())
        }
    };

    let (first, last) = if total == 0 {
        (None, None)
    } else {
        let last_offset = ((total - 1) / spec.limit) * spec.limit;
        (
            Some(remove_query_param(base_url, &config.offset_param)),
            Some(at_offset(last_offset)),
        )
    };

    PageLinks {
        first,
        last,
        prev: (spec.offset > 0).then(|| at_offset(spec.offset.saturating_sub(spec.limit))),
        next: (spec.offset.saturating_add(spec.limit) < total)
            .then(|| at_offset(spec.offset + spec.limit)),
        total,
        pages: last_page(total, spec.limit),
    }
}

fn parse_param(
    query: &RequestQuery,
    key: &str,
    default: u64,
    minimum: u64,
) -> Result<u64, ErrorList> {
    let Some(raw) = query.param(key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(value) if value >= minimum => Ok(value),
        _ => Err(ErrorList::new(Problem::InvalidParameter.at_parameter(
            key,
            format!("'{}' must be an integer >= {}", raw, minimum),
        ))),
    }
}
