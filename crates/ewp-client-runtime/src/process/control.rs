//! Best-effort control channel to the running core process.

use std::time::Duration;

use tracing::debug;

/// Upper bound on the whole quit request, connect included.
const QUIT_TIMEOUT: Duration = Duration::from_millis(500);

/// Ask the core to shut itself down via `POST http://{addr}/quit`.
///
/// Strictly best-effort: an empty address is a no-op, the response is
/// discarded, and every failure (refused connection, timeout) is swallowed.
/// A failure only means the process will be terminated by the next
/// escalation tier. Never returns an error and never takes longer than the
/// fixed timeout.
pub async fn request_quit(addr: &str) {
    if addr.is_empty() {
        return;
    }

    let url = format!("http://{addr}/quit");
    let client = match reqwest::Client::builder().timeout(QUIT_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "control client construction failed");
            return;
        }
    };

    match client
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("")
        .send()
        .await
    {
        Ok(response) => debug!(%url, status = %response.status(), "quit request delivered"),
        Err(e) => debug!(%url, error = %e, "quit request failed; escalation will terminate"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn empty_address_is_a_noop() {
        request_quit("").await;
    }

    #[tokio::test]
    async fn refused_connection_is_swallowed() {
        // Nothing listens here; the call must neither error nor panic.
        request_quit("127.0.0.1:1").await;
    }

    #[tokio::test]
    async fn unreachable_address_stays_within_the_bound() {
        let started = Instant::now();
        // TEST-NET-1 address, guaranteed unrouteable: exercises the timeout.
        request_quit("192.0.2.1:9090").await;
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
