//! sparql-batch - runs SPARQL search queries one at a time and reports timings.

use std::io;

use sparql_batch::cli::Cli;
use sparql_batch::config::Config;
use sparql_batch::error::Result;
use sparql_batch::logging;
use sparql_batch::query::{load_queue, BatchExecutor, BatchStatus};
use sparql_batch::report::{JsonReporter, OutputFormat, Reporter, TextReporter};
use sparql_batch::transport::HttpTransport;
use tracing::{error, info};

/// Exit code when set-up fails before any query runs.
const EXIT_SETUP_FAILED: i32 = 1;

/// Exit code when a query halted the batch.
const EXIT_HALTED: i32 = 2;

#[tokio::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(cli).await {
        Ok(status) if status.is_completed() => {}
        Ok(_) => std::process::exit(EXIT_HALTED),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(EXIT_SETUP_FAILED);
        }
    }
}

async fn run(cli: Cli) -> Result<BatchStatus> {
    // Precedence: CLI flags, then config file, then environment, then defaults
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.endpoint.apply_env_defaults();
    cli.apply_to(&mut config);

    let endpoint = config.endpoint.to_endpoint()?;
    let queue = load_queue(&cli.paths)?;
    info!(
        "Running {} queries against {}",
        queue.len(),
        endpoint.display_string()
    );

    let transport = HttpTransport::new()?;
    let executor = BatchExecutor::new(&transport, &endpoint)
        .with_summary_field(config.report.summary_field.clone())
        .with_deadline(config.endpoint.deadline());

    let mut reporter: Box<dyn Reporter> = match config.report.format {
        OutputFormat::Text => Box::new(
            TextReporter::new(io::stdout(), io::stderr()).with_body(config.report.print_body),
        ),
        OutputFormat::Json => {
            Box::new(JsonReporter::new(io::stdout()).with_body(config.report.print_body))
        }
    };

    executor.run_from(&queue, cli.start, reporter.as_mut()).await
}
