use clap::Parser;
use pansel_cli::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Size(args) => commands::size::run(args),
        Commands::Report(args) => commands::report::run(args),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
