use anyhow::Result;
use clap::Parser;
use tabular_insight_cli::{init_tracing, run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs, cli.verbose)?;
    run(cli)
}
