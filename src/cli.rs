//! Command-line interface
//!
//! respawn run -- <cmd> [args..]   - Supervise a command under a detached watchdog
//! respawn secret                  - Resolve the user secret and print it
//! respawn resolve <host>          - Resolve a hostname to its IPv4 address

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "respawn", version, about = "Keep a command running under a detached watchdog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detach from the terminal and restart the command whenever it dies
    Run {
        /// Watchdog log file (default: $RESPAWN_LOG_DIR/respawn.log)
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Supervisor config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run the command once in the foreground (no detach, no supervision)
        #[arg(long)]
        foreground: bool,

        /// Command and arguments to supervise
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Resolve the user secret (file > literal > prompt > generated) and print it
    Secret {
        /// Read the secret from this file
        #[arg(long)]
        secret_file: Option<PathBuf>,

        /// Use this literal secret
        #[arg(long)]
        secret: Option<String>,
    },

    /// Resolve a hostname or dotted-decimal string to an IPv4 address
    Resolve {
        host: String,
    },
}

/// Supervise `command` under the watchdog, or run it once with `--foreground`.
pub fn run(
    log_file: Option<PathBuf>,
    config: Option<PathBuf>,
    foreground: bool,
    command: Vec<String>,
) -> Result<()> {
    let config = crate::config::SupervisorConfig::load(config.as_deref())?;

    if foreground {
        let status = spawn_payload(&command)?;
        std::process::exit(status);
    }

    supervise(log_file, &config, &command)
}

#[cfg(unix)]
fn supervise(
    log_file: Option<PathBuf>,
    config: &crate::config::SupervisorConfig,
    command: &[String],
) -> Result<()> {
    use std::fs;

    let log_path = log_file.unwrap_or_else(|| crate::config::log_dir().join("respawn.log"));
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let sink = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    // Point tracing at the same sink before stderr goes away. Synchronous
    // writer: background appender threads do not survive fork.
    init_logging_file(sink.try_clone()?);

    println!("Detaching; diagnostics go to {}", log_path.display());

    // Returns only in the worker, once per supervision cycle.
    crate::supervisor::daemonize(sink, config)?;

    match spawn_payload(command) {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            tracing::error!("worker failed to launch payload: {e:#}");
            std::process::exit(127);
        }
    }
}

#[cfg(not(unix))]
fn supervise(
    _log_file: Option<PathBuf>,
    _config: &crate::config::SupervisorConfig,
    _command: &[String],
) -> Result<()> {
    anyhow::bail!("daemon supervision requires a Unix platform")
}

/// Run the payload command to completion, returning its exit code
/// (128+signo for signal deaths).
fn spawn_payload(command: &[String]) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .context("no command given to supervise")?;
    let status = std::process::Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("spawning '{program}'"))?;

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        Ok(status
            .code()
            .or_else(|| status.signal().map(|s| 128 + s))
            .unwrap_or(1))
    }
    #[cfg(not(unix))]
    {
        Ok(status.code().unwrap_or(1))
    }
}

/// Resolve and print the user secret.
pub fn secret(secret_file: Option<PathBuf>, secret: Option<String>) -> Result<()> {
    let resolved = crate::secret::user_secret(secret_file.as_deref(), secret.as_deref())?;
    println!("{}", resolved.as_str());
    Ok(())
}

/// Resolve and print a host address, both dotted and legacy network-order.
pub fn resolve(host: &str) -> Result<()> {
    let ip = crate::net::resolve_host(host)
        .with_context(|| format!("resolving '{host}'"))?;
    println!("{ip} (0x{:08X})", u32::from_be_bytes(ip.octets()));
    Ok(())
}

/// Log to stderr, for the short-lived subcommands.
pub fn init_logging_simple() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log to the watchdog's sink; used before detaching.
#[cfg(unix)]
fn init_logging_file(file: std::fs::File) {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
}
