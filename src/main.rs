mod cmd;

use clap::Parser;
use cmd::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let res = match &cli.command {
        Commands::Show(a) => a.run(config),
        Commands::Table(a) => a.run(config),
        Commands::Check(a) => a.run(config),
    };
    if let Err(err) = res {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
