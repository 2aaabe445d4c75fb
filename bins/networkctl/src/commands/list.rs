//! networkctl list command implementation.

use anyhow::Context;
use clap::Args;
use netstatus::output::{LinkListing, OutputFormat, OutputOptions, Printable};
use netstatus::{HardwareDatabase, Reporter, RtnlDump};

#[derive(Args, Default)]
pub struct ListCmd {}

impl ListCmd {
    pub async fn run<S: RtnlDump, H: HardwareDatabase>(
        &self,
        reporter: &Reporter<S, H>,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> anyhow::Result<()> {
        let links = reporter
            .list()
            .await
            .context("Failed to enumerate links")?;

        let mut stdout = std::io::stdout().lock();
        LinkListing(&links).print(&mut stdout, format, opts)?;
        Ok(())
    }
}
