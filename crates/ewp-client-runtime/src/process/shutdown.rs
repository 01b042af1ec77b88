//! Forced termination of the core process with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::timeout;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Terminate a child cooperatively, escalating to an unconditional kill.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to `term_wait` for a voluntary exit
/// 2. If still running, SIGKILL and wait up to `kill_wait` for reaping
///
/// # Platform behavior
/// - Unix: SIGTERM via the nix crate, then SIGKILL
/// - Windows: immediate `kill()` (no cooperative termination available)
///
/// # Returns
/// - `Ok(ExitStatus)` once the process has been reaped
/// - `Err` if signalling fails, or with `TimedOut` in the pathological case
///   where the process survives past `kill_wait` (the caller's
///   `kill_on_drop` backstop still applies)
pub(crate) async fn shutdown_child(
    child: &mut Child,
    term_wait: Duration,
    kill_wait: Duration,
) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        shutdown_unix(child, term_wait, kill_wait).await
    }

    #[cfg(not(unix))]
    {
        let _ = term_wait;
        kill_and_reap(child, kill_wait).await
    }
}

#[cfg(unix)]
async fn shutdown_unix(
    child: &mut Child,
    term_wait: Duration,
    kill_wait: Duration,
) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already reaped; wait() returns the cached status.
        return child.wait().await;
    };

    if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        // Process may have already exited
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(term_wait, child.wait()).await {
        return result;
    }

    kill_and_reap(child, kill_wait).await
}

async fn kill_and_reap(child: &mut Child, kill_wait: Duration) -> io::Result<ExitStatus> {
    child.start_kill()?;
    match timeout(kill_wait, child.wait()).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "process did not exit after kill",
        )),
    }
}
