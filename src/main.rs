use clap::Parser;
use respawn::cli::{self, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            log_file,
            config,
            foreground,
            command,
        } => {
            // Logging for this path is initialized against the watchdog's
            // sink inside cli::run, after the log file is open.
            cli::run(log_file, config, foreground, command)
        }
        Commands::Secret {
            secret_file,
            secret,
        } => {
            cli::init_logging_simple();
            cli::secret(secret_file, secret)
        }
        Commands::Resolve { host } => {
            cli::init_logging_simple();
            cli::resolve(&host)
        }
    }
}
