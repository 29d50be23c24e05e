//! Paginate command implementation.

use std::path::PathBuf;

use jsonapi_codec::{compute_links, compute_offset_links, OffsetSpec, PageSpec, RequestQuery};
use serde_json::json;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output;

pub fn run(
    url: String,
    total: u64,
    config: Option<PathBuf>,
    offset: bool,
) -> Result<(), CliError> {
    let config = CliConfig::load(config.as_deref())?;
    let query = RequestQuery::from_url(&url).map_err(output::reject)?;

    let links = if offset {
        let spec = OffsetSpec::from_query(&query, &config.pagination).map_err(output::reject)?;
        compute_offset_links(&url, &spec, total, &config.pagination)
    } else {
        let spec = PageSpec::from_query(&query, &config.pagination).map_err(output::reject)?;
        compute_links(&url, &spec, total, &config.pagination)
    };

    output::print_json(&json!({
        "links": {
            "first": links.first,
            "last": links.last,
            "prev": links.prev,
            "next": links.next,
        },
        "meta": {
            "total": links.total,
            "pages": links.pages,
        },
    }));
    Ok(())
}
