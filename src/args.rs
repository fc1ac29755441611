//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "recon", version, about = "Reconcile an invoice against one or more bills")]
pub struct Args {
    /// Log level for stderr diagnostics (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "RECON_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile one invoice against one or more bills and print the report.
    Reconcile(ReconcileArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReconcileArgs {
    /// Path to the invoice record (JSON), or the raw document with --extract.
    #[arg(long)]
    invoice: PathBuf,

    /// Path to a bill record (JSON); repeat for multiple bills. Report
    /// ordering follows the order given here.
    #[arg(long = "bill", required = true)]
    bills: Vec<PathBuf>,

    /// Send the input files through the extraction service first instead of
    /// treating them as already-extracted records.
    #[arg(long)]
    extract: bool,

    /// Skip the narrative-summary service and use the local summary template.
    #[arg(long)]
    no_summary: bool,
}

impl ReconcileArgs {
    pub fn new(invoice: PathBuf, bills: Vec<PathBuf>, extract: bool, no_summary: bool) -> Self {
        Self {
            invoice,
            bills,
            extract,
            no_summary,
        }
    }

    pub fn invoice(&self) -> &Path {
        &self.invoice
    }

    pub fn bills(&self) -> &[PathBuf] {
        &self.bills
    }

    pub fn extract(&self) -> bool {
        self.extract
    }

    pub fn no_summary(&self) -> bool {
        self.no_summary
    }
}
