use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphsql::Session;
use graphsql_configuration::environment::ProcessEnvironment;
use graphsql_configuration::values::Secret;
use graphsql_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration,
    ParsedConfiguration,
};

/// Run a SQL SELECT statement against a GraphQL endpoint.
///
/// Prints the column names as a JSON array, then one JSON object per row.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding configuration.json.
    #[arg(long, env = "GRAPHSQL_CONFIGURATION_DIRECTORY")]
    configuration: Option<PathBuf>,

    /// Endpoint URL, overriding the configured one.
    #[arg(long)]
    endpoint: Option<String>,

    /// Write an initial configuration into this directory and exit.
    #[arg(long, conflicts_with = "sql")]
    init: Option<PathBuf>,

    /// The statement to run.
    #[arg(required_unless_present = "init")]
    sql: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    if let Some(dir) = args.init {
        write_parsed_configuration(ParsedConfiguration::initial(), &dir).await?;
        tracing::info!(dir = %dir.display(), "wrote initial configuration");
        return Ok(());
    }

    let mut parsed = match args.configuration {
        Some(dir) => parse_configuration(dir).await?,
        None => ParsedConfiguration::initial(),
    };
    if let Some(endpoint) = args.endpoint {
        parsed.endpoint = Secret::from(endpoint);
    }
    let configuration = make_runtime_configuration(parsed, ProcessEnvironment)?;

    let mut metrics_registry = prometheus::Registry::new();
    let session = Session::from_configuration(&configuration, &mut metrics_registry)?;

    let sql = args.sql.unwrap_or_default();
    let rows = session.execute(&sql).await?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string(&rows.columns)?)?;
    for row in &rows.rows {
        writeln!(stdout, "{}", serde_json::to_string(row)?)?;
    }
    if rows.truncated {
        tracing::warn!(rows = rows.len(), "result truncated at the configured row bound");
    }
    Ok(())
}
