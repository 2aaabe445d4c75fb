//! networkctl command - query the status of network links.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use netstatus::output::{OutputFormat, OutputOptions};
use netstatus::{Connection, Reporter, StatusConfig};

#[derive(Parser)]
#[command(name = "networkctl", version, about = "Query the status of network links")]
struct Cli {
    /// Do not pipe output into a pager.
    #[arg(long)]
    no_pager: bool,

    /// Do not show the headers and footers.
    #[arg(long)]
    no_legend: bool,

    /// Show status for all links.
    #[arg(short = 'a', long)]
    all: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Read runtime state below this directory instead of /.
    #[arg(long, hide = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List links.
    List(commands::list::ListCmd),

    /// Show link status.
    Status(commands::status::StatusCmd),

    /// Show LLDP neighbors.
    Lldp(commands::lldp::LldpCmd),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.no_pager {
        tracing::debug!("--no-pager given, output is never paged");
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let opts = OutputOptions {
        color: atty::is(atty::Stream::Stdout),
        legend: !cli.no_legend,
        pretty: cli.pretty,
    };

    let config = match &cli.root {
        Some(root) => StatusConfig::with_root(root),
        None => StatusConfig::default(),
    };

    let conn = Connection::new().context("Failed to connect to netlink")?;
    let reporter = Reporter::new(conn, config.open_hwdb(), config);

    match cli.command.unwrap_or_default() {
        Command::List(cmd) => cmd.run(&reporter, format, &opts).await,
        Command::Status(cmd) => cmd.run(&reporter, format, &opts, cli.all).await,
        Command::Lldp(cmd) => cmd.run(&reporter, format, &opts).await,
    }
}

impl Default for Command {
    fn default() -> Self {
        Command::List(commands::list::ListCmd::default())
    }
}
