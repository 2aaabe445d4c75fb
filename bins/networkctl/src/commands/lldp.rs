//! networkctl lldp command implementation.

use anyhow::Context;
use clap::Args;
use netstatus::output::{LldpListing, OutputFormat, OutputOptions, Printable};
use netstatus::{HardwareDatabase, Reporter, RtnlDump};

#[derive(Args)]
pub struct LldpCmd {}

impl LldpCmd {
    pub async fn run<S: RtnlDump, H: HardwareDatabase>(
        &self,
        reporter: &Reporter<S, H>,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> anyhow::Result<()> {
        let entries = reporter
            .lldp()
            .await
            .context("Failed to enumerate links")?;

        let mut stdout = std::io::stdout().lock();
        LldpListing(&entries).print(&mut stdout, format, opts)?;
        Ok(())
    }
}
