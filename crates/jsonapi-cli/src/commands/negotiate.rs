//! Negotiate command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use jsonapi_negotiate::{Negotiation, Negotiator, RequestMeta};
use serde_json::json;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output;

pub fn run(
    config: Option<PathBuf>,
    type_name: String,
    accept: Option<String>,
    content_type: Option<String>,
    format: Option<String>,
) -> Result<(), CliError> {
    let config = CliConfig::load(config.as_deref())?;
    let negotiator = Negotiator::new(config.registry()?, Arc::new(config.formats()))
        .with_options(config.negotiation.clone());
    let endpoint = config.endpoint(&type_name);

    let mut request = RequestMeta::new();
    if let Some(accept) = accept {
        request = request.accept(accept);
    }
    if let Some(content_type) = content_type {
        request = request.body(content_type);
    }
    if let Some(format) = format {
        request = request.format(format);
    }

    match negotiator.negotiate(&endpoint, &request)? {
        Negotiation::Selected(negotiated) => {
            output::print_json(&json!({
                "format": negotiated.response().name(),
                "content_type": negotiated.content_type(),
                "request_format": negotiated.request().map(|format| format.name()),
                "reason": negotiated.reason(),
                "serializer": negotiated.effective_serializer(),
            }));
            Ok(())
        }
        Negotiation::Rejected(errors) => Err(output::reject(errors)),
    }
}
