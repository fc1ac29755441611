use anyhow::Context;
use clap::Parser;
use invoice_recon::api::Mode;
use invoice_recon::args::{Args, Command};
use invoice_recon::{commands, Config};
use std::process::ExitCode;
use tracing::{error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn main_inner(args: Args) -> anyhow::Result<()> {
    trace!("{args:?}");
    let config = Config::from_env();

    // This allows running the whole flow without any upstream services. When
    // RECON_IN_TEST_MODE is set and non-zero in length, the in-crate test
    // doubles are used instead of the configured HTTP endpoints.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Reconcile(reconcile_args) => {
            let response = commands::reconcile(&config, mode, reconcile_args)
                .await
                .context("reconciliation failed")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    };
    Ok(())
}

/// Diagnostics go to stderr so that stdout carries only the report JSON.
fn init_logger(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
