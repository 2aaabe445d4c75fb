//! networkctl status command implementation.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use netstatus::output::{OutputFormat, OutputOptions, Printable};
use netstatus::{HardwareDatabase, Reporter, RtnlDump, StatusReport, StatusScope};

#[derive(Args)]
pub struct StatusCmd {
    /// Links to show, by name or index.
    #[arg(value_name = "LINK")]
    links: Vec<String>,
}

impl StatusCmd {
    fn scope(&self, all: bool) -> StatusScope {
        if all {
            StatusScope::All
        } else if self.links.is_empty() {
            StatusScope::System
        } else {
            StatusScope::Links(self.links.clone())
        }
    }

    pub async fn run<S: RtnlDump, H: HardwareDatabase>(
        &self,
        reporter: &Reporter<S, H>,
        format: OutputFormat,
        opts: &OutputOptions,
        all: bool,
    ) -> anyhow::Result<()> {
        let report = reporter
            .status(self.scope(all))
            .await
            .context("Failed to enumerate links")?;

        let mut stdout = std::io::stdout().lock();
        match report {
            StatusReport::System(system) => system.print(&mut stdout, format, opts)?,
            StatusReport::Links(results) if format == OutputFormat::Json => {
                let mut reports = Vec::with_capacity(results.len());
                for result in results {
                    match result {
                        Ok(report) => reports.push(report),
                        Err(e) => eprintln!("Failed to query link: {}", e),
                    }
                }
                reports.as_slice().print(&mut stdout, format, opts)?;
            }
            StatusReport::Links(results) => {
                for (i, result) in results.into_iter().enumerate() {
                    if i > 0 {
                        writeln!(stdout)?;
                    }
                    match result {
                        Ok(report) => report.print_text(&mut stdout, opts)?,
                        Err(e) => eprintln!("Failed to query link: {}", e),
                    }
                }
            }
        }
        Ok(())
    }
}
