pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod secret;
pub mod supervisor;

pub use config::SupervisorConfig;
pub use error::{RespawnError, Result};
pub use net::{hton, resolve_host, INADDR_NONE};
pub use secret::user_secret;
pub use supervisor::RestartThrottle;

#[cfg(unix)]
pub use supervisor::{daemonize, FATAL_EXIT_CODE};
