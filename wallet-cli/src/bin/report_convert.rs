use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use wallet_cli::logging::init_logging;
use wallet_cli::VERSION;
use wallet_ingest::{convert_file, load_options};

#[derive(Parser, Debug)]
#[command(
    name = "report-convert",
    version = VERSION,
    about = "Convert exported PDF statements into CSV files"
)]
struct Cli {
    /// Print nothing but errors
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// YAML file with the convert options
    options: PathBuf,

    /// PDF statements; each CSV is written next to its input
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let options = load_options(&cli.options)
        .with_context(|| format!("load options {}", cli.options.display()))?;

    for input in &cli.inputs {
        let output = convert_file(input, &options)
            .with_context(|| format!("convert {}", input.display()))?;
        if !cli.quiet {
            println!("{}", output.display());
        }
    }

    Ok(())
}
