use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcp_filter::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("gcp_filter=debug,info")
    } else {
        EnvFilter::new("gcp_filter=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Filter(args) => {
            cli::filter::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Inspect(args) => {
            cli::inspect::run(&args, cli.format)?;
        }
    }

    Ok(())
}
