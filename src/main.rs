use std::process::ExitCode;

use c_fuzz::cli::{self, Args};
use c_fuzz::permute::marker_count;
use c_fuzz::{expand, Console, HttpFetcher, Runner, SessionLog, LOG_FILE};
use clap::{CommandFactory, Parser};
use log::info;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let Some(uri) = args.uri else {
        Args::command().print_help()?;
        return Ok(());
    };

    cli::validate(&uri)?;

    let uris = expand(&uri);
    info!(
        "{} markers, {} candidates from {}",
        marker_count(&uri),
        uris.len(),
        uri
    );

    let log = if args.log {
        Some(SessionLog::create(LOG_FILE, &uri, chrono::Utc::now())?)
    } else {
        None
    };

    let mut sink = (Console::stdout(), log);
    let summary = Runner::new(HttpFetcher::new()).run(&uris, &mut sink).await?;

    info!(
        "{} of {} tests passed, {} failed",
        summary.passed,
        summary.total(),
        summary.failed
    );

    Ok(())
}
