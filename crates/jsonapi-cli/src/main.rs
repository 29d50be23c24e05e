//! jsonapi CLI - encode, decode and negotiate JSON:API documents.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use jsonapi_codec::Operation;
use jsonapi_negotiate::JSONAPI_FORMAT;

mod commands;
mod config;
mod error;
mod logging;
mod output;

use commands::{check_registry, decode, encode, negotiate, paginate};

#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(about = "JSON:API document codec and content negotiation CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an entity (or an array of entities) into a document
    Encode {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format name
        #[arg(long, default_value = JSONAPI_FORMAT)]
        format: String,
        /// Request URL used for pagination links
        #[arg(long)]
        url: Option<String>,
        /// Total item count; encodes the input as one page
        #[arg(long)]
        total: Option<u64>,
    },
    /// Validate a request document and print the decoded resources
    Decode {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Resource type the endpoint expects
        #[arg(long = "type")]
        type_name: Option<String>,
        /// Resource id addressed by an update
        #[arg(long)]
        id: Option<String>,
        /// Kind of write
        #[arg(long, value_enum, default_value_t = OperationArg::Create)]
        operation: OperationArg,
        /// Expect an array of resources
        #[arg(long)]
        collection: bool,
        /// Input format name
        #[arg(long, default_value = JSONAPI_FORMAT)]
        format: String,
        /// Parse any document (responses included) without a schema
        #[arg(long)]
        document: bool,
    },
    /// Compute pagination links for a request URL
    Paginate {
        /// Request URL including page parameters
        url: String,
        /// Total item count
        #[arg(long)]
        total: u64,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Use limit/offset instead of page number/size
        #[arg(long)]
        offset: bool,
    },
    /// Pick the response format for a request
    Negotiate {
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Endpoint resource type
        #[arg(long = "type")]
        type_name: String,
        /// Accept header
        #[arg(long)]
        accept: Option<String>,
        /// Content-Type header of the request body
        #[arg(long)]
        content_type: Option<String>,
        /// Explicit format query parameter
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate the resource registry and endpoint defaults
    CheckRegistry {
        /// Configuration file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationArg {
    Create,
    Update,
    Reference,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Create => Operation::Create,
            OperationArg::Update => Operation::Update,
            OperationArg::Reference => Operation::Reference,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            input,
            config,
            format,
            url,
            total,
        } => encode::run(input, config, format, url, total),
        Commands::Decode {
            input,
            config,
            type_name,
            id,
            operation,
            collection,
            format,
            document,
        } => decode::run(decode::DecodeArgs {
            input,
            config,
            type_name,
            id,
            operation: operation.into(),
            collection,
            format_name: format,
            document,
        }),
        Commands::Paginate {
            url,
            total,
            config,
            offset,
        } => paginate::run(url, total, config, offset),
        Commands::Negotiate {
            config,
            type_name,
            accept,
            content_type,
            format,
        } => negotiate::run(config, type_name, accept, content_type, format),
        Commands::CheckRegistry { config } => check_registry::run(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
