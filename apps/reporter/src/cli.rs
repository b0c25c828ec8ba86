use clap::Parser;

/// Post the morning market report to a chat webhook.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Print the composed message instead of posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Run even when today is not a trading day
    #[arg(long)]
    pub force: bool,
}
