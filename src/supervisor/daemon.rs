//! Unix daemonization and the watchdog loop.
//!
//! `daemonize` turns the calling process into a detached watchdog that keeps
//! exactly one worker alive. Of the processes involved, only the worker ever
//! returns to the caller: the original parent exits 0 once the terminal has
//! been relinquished, and the watchdog loops until killed externally.

use std::io::Write;
use std::process;
use std::thread;
use std::time::Instant;

use chrono::Local;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, fork, setsid, ForkResult, Pid};
use tracing::info;

use super::throttle::{restart_line, RestartThrottle};
use crate::config::SupervisorConfig;
use crate::error::Result;

/// Exit status of the watchdog when process duplication or detachment fails.
pub const FATAL_EXIT_CODE: i32 = 255;

enum Spawned {
    Worker,
    Watchdog(Pid),
}

/// Detach from the controlling terminal and supervise a worker.
///
/// Forks once to shed the terminal (the parent exits 0), starts a new
/// session, closes the three standard streams, then enters the restart
/// loop. Returns `Ok(())` exactly once, in the worker process; the caller's
/// code after this call runs inside each freshly forked worker. Diagnostic
/// lines for worker deaths go to `sink`, which is inherited unmodified by
/// every worker.
///
/// Fork, setsid, stream teardown, and signal disposition failures are all
/// fatal: a diagnostic is written to `sink` and the process exits with
/// [`FATAL_EXIT_CODE`]. Running half-detached is never an option.
pub fn daemonize<W: Write>(mut sink: W, config: &SupervisorConfig) -> Result<()> {
    match unsafe { fork() } {
        // Parent's sole purpose was to relinquish the terminal.
        Ok(ForkResult::Parent { .. }) => process::exit(0),
        Ok(ForkResult::Child) => {}
        Err(e) => fatal(&mut sink, &format!("fork: {e}")),
    }

    if let Err(e) = setsid() {
        fatal(&mut sink, &format!("setsid: {e}"));
    }
    // Headless from here on.
    for fd in 0..=2 {
        if let Err(e) = close(fd) {
            fatal(&mut sink, &format!("close({fd}): {e}"));
        }
    }

    run_watchdog(sink, config)
}

fn run_watchdog<W: Write>(mut sink: W, config: &SupervisorConfig) -> Result<()> {
    let mut throttle = RestartThrottle::new(config);
    info!(pid = process::id(), "watchdog detached and running");

    loop {
        match spawn_worker(&mut sink) {
            // The only return path out of daemonize.
            Spawned::Worker => return Ok(()),
            Spawned::Watchdog(child) => {
                let status = match waitpid(child, None) {
                    Ok(ws) => wait_code(ws),
                    Err(e) => fatal(&mut sink, &format!("waitpid({child}): {e}")),
                };
                let delay = throttle.delay_after_exit(Instant::now());
                let line = restart_line(Local::now(), status, delay);
                let _ = writeln!(sink, "{line}");
                let _ = sink.flush();
                thread::sleep(delay);
                throttle.mark_restarted(Instant::now());
            }
        }
    }
}

fn spawn_worker<W: Write>(sink: &mut W) -> Spawned {
    // Default disposition so the blocking waitpid below observes the
    // termination instead of having it reaped behind our back.
    if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigDfl) } {
        fatal(sink, &format!("signal(SIGCHLD, default): {e}"));
    }
    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            // The worker may spawn children of its own without reaping them.
            if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
                fatal(sink, &format!("signal(SIGCHLD, ignore): {e}"));
            }
            Spawned::Worker
        }
        Ok(ForkResult::Parent { child }) => Spawned::Watchdog(child),
        Err(e) => fatal(sink, &format!("fork: {e}")),
    }
}

/// Collapse a wait status into the single code reported in the diagnostic
/// line: the exit code for normal exits, 128+signo for signal deaths.
fn wait_code(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
        other => {
            // waitpid without WUNTRACED/WCONTINUED only reports terminations
            tracing::warn!(?other, "unexpected wait status");
            -1
        }
    }
}

fn fatal<W: Write>(sink: &mut W, msg: &str) -> ! {
    let _ = writeln!(
        sink,
        "{} FATAL: {msg}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = sink.flush();
    process::exit(FATAL_EXIT_CODE);
}
