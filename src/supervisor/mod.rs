//! Daemon supervision: session detachment plus a watchdog restart loop.
//!
//! - Restart throttle deciding how soon a dead worker is relaunched
//! - Unix daemonization (fork, setsid, stdio teardown) and the watchdog
//!   loop itself

pub mod throttle;

#[cfg(unix)]
pub mod daemon;

pub use throttle::RestartThrottle;

#[cfg(unix)]
pub use daemon::{daemonize, FATAL_EXIT_CODE};
