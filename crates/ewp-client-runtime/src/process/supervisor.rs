//! Supervisor for the external core process.
//!
//! The [`CoreSupervisor`] handle talks to a dedicated actor task that owns
//! every piece of mutable state: the child handle, the discovered control
//! address, the config artifact and the retry bookkeeping. Commands from
//! callers, demuxed output lines, child exits and timer deadlines are all
//! observed through one `select!` loop, so transitions never interleave and
//! no locking is needed.
//!
//! Key design decisions:
//! - **Caller-requested flag gates crash classification**: the flag is set
//!   before any termination is issued, so a forced stop that the platform
//!   reports as a crash-like exit is never treated as one.
//! - **Startup confirmation is the control-address announcement**: the
//!   `CONTROL_ADDR=` line is the only readiness signal the core contract
//!   provides, bounded by `startup_timeout`.
//! - **Command arm wins the race**: the select loop is biased towards
//!   commands, so a stop observed together with an elapsed backoff timer
//!   cancels the reconnect instead of racing it.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Child;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Instant, sleep_until, timeout};
use tracing::{debug, info, warn};

use ewp_client_core::ports::ConfigBuilderPort;
use ewp_client_core::{AppSettings, ConnectionProfile};

use super::artifact::ConfigArtifact;
use super::control;
use super::error::SupervisorError;
use super::events::CoreEvent;
use super::locate;
use super::retry::RetryPolicy;
use super::shutdown;
use super::stream::{self, OutputLine, StreamSource};

const CMD_CAPACITY: usize = 16;
const LINE_CAPACITY: usize = 256;

/// Everything needed to (re)establish one core run.
///
/// Captured verbatim at start time; the reconnection path re-issues the
/// stored value unchanged, so an automatic restart is indistinguishable
/// from the original request.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub profile: ConnectionProfile,
    pub settings: AppSettings,
    pub tun_mode: bool,
}

impl RunRequest {
    #[must_use]
    pub fn new(profile: ConnectionProfile, settings: AppSettings) -> Self {
        Self {
            profile,
            settings,
            tun_mode: false,
        }
    }

    #[must_use]
    pub const fn with_tun_mode(mut self, tun_mode: bool) -> Self {
        self.tun_mode = tun_mode;
        self
    }
}

/// Lifecycle state of the supervised core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisorState {
    Idle,
    Starting,
    Running,
    Stopping,
    Reconnecting,
}

/// Point-in-time snapshot for callers and diagnostics.
#[derive(Debug, Clone)]
pub struct SupervisorStatus {
    pub state: SupervisorState,
    /// Control endpoint announced by the current run, if any.
    pub control_addr: Option<String>,
    /// OS pid of the live child, if any.
    pub pid: Option<u32>,
    /// On-disk config artifact of the current run, if any.
    pub config_path: Option<PathBuf>,
    /// Reconnection attempt currently scheduled or in flight (0 = none).
    pub retry_attempt: u32,
}

/// Tunables for one supervisor instance.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Explicit core executable path; `None` enables the search order
    /// (host executable directory, its parent, then PATH).
    pub executable: Option<PathBuf>,
    /// How long the core may take to announce its control endpoint.
    pub startup_timeout: Duration,
    /// Wait after a control-channel quit before escalating.
    pub graceful_wait: Duration,
    /// Wait after cooperative termination before the unconditional kill.
    pub terminate_wait: Duration,
    /// Wait for reaping after the unconditional kill.
    pub kill_wait: Duration,
    pub retry: RetryPolicy,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            executable: None,
            startup_timeout: Duration::from_secs(5),
            graceful_wait: Duration::from_millis(500),
            terminate_wait: Duration::from_millis(300),
            kill_wait: Duration::from_millis(200),
            retry: RetryPolicy::default(),
            event_capacity: 64,
        }
    }
}

enum Request {
    Start {
        req: RunRequest,
        reply: oneshot::Sender<Result<(), SupervisorError>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    Status {
        reply: oneshot::Sender<SupervisorStatus>,
    },
}

/// Handle to the supervisor actor.
///
/// Cloneable; the actor force-terminates any live core and cleans up when
/// the last handle is dropped.
#[derive(Clone)]
pub struct CoreSupervisor {
    cmd_tx: mpsc::Sender<Request>,
    events: broadcast::Sender<CoreEvent>,
}

impl CoreSupervisor {
    /// Create the supervisor and spawn its actor task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: SupervisorConfig, builder: Arc<dyn ConfigBuilderPort>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CAPACITY);
        let (line_tx, line_rx) = mpsc::channel(LINE_CAPACITY);
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let actor = Actor {
            cfg: config,
            builder,
            cmd_rx,
            line_tx,
            line_rx,
            events: events.clone(),
            state: SupervisorState::Idle,
            run: None,
            last_request: None,
            stop_requested: false,
            retry_attempt: 0,
            reconnect_at: None,
            startup_deadline: None,
            run_seq: 0,
        };
        tokio::spawn(actor.run());

        Self { cmd_tx, events }
    }

    /// Subscribe to lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.events.subscribe()
    }

    /// Start the core with the given request.
    ///
    /// Fails synchronously, before any process is spawned, with
    /// `AlreadyRunning`, `ExecutableNotFound`, `InvalidProfile` or
    /// `ConfigMaterializationFailed`. On success the child is spawned and
    /// readiness is reported asynchronously via [`CoreEvent::Started`].
    pub async fn start(&self, req: RunRequest) -> Result<(), SupervisorError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Request::Start { req, reply })
            .await
            .map_err(|_| SupervisorError::SupervisorGone)?;
        rx.await.map_err(|_| SupervisorError::SupervisorGone)?
    }

    /// Stop the core, blocking for at most roughly one second.
    ///
    /// Idempotent: calling it while idle is a no-op. Also cancels any
    /// pending reconnection.
    pub async fn stop(&self) {
        let (reply, rx) = oneshot::channel();
        if self.cmd_tx.send(Request::Stop { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// Snapshot the current supervisor state.
    pub async fn status(&self) -> SupervisorStatus {
        let (reply, rx) = oneshot::channel();
        if self.cmd_tx.send(Request::Status { reply }).await.is_ok() {
            if let Ok(status) = rx.await {
                return status;
            }
        }
        debug!("supervisor actor gone; reporting idle");
        SupervisorStatus {
            state: SupervisorState::Idle,
            control_addr: None,
            pid: None,
            config_path: None,
            retry_attempt: 0,
        }
    }

    /// True while a run is being established or serving.
    pub async fn is_running(&self) -> bool {
        matches!(
            self.status().await.state,
            SupervisorState::Starting | SupervisorState::Running
        )
    }
}

impl std::fmt::Debug for CoreSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreSupervisor").finish()
    }
}

/// One spawned core process and the per-run state scoped to it.
struct ActiveRun {
    child: Child,
    pid: Option<u32>,
    artifact: ConfigArtifact,
    control_addr: Option<String>,
    run_id: u64,
}

enum Wake {
    Cmd(Option<Request>),
    Line(OutputLine),
    Exited(io::Result<ExitStatus>),
    StartupDeadline,
    ReconnectDue,
}

struct Actor {
    cfg: SupervisorConfig,
    builder: Arc<dyn ConfigBuilderPort>,
    cmd_rx: mpsc::Receiver<Request>,
    /// Kept so reader tasks always have a live receiver to send to.
    line_tx: mpsc::Sender<OutputLine>,
    line_rx: mpsc::Receiver<OutputLine>,
    events: broadcast::Sender<CoreEvent>,
    state: SupervisorState,
    run: Option<ActiveRun>,
    /// Last externally submitted request, replayed verbatim on reconnect.
    last_request: Option<RunRequest>,
    /// Captured before any termination is issued; gates crash
    /// classification instead of the OS-reported exit reason.
    stop_requested: bool,
    /// Reconnection attempt currently scheduled or in flight (0 = none).
    retry_attempt: u32,
    reconnect_at: Option<Instant>,
    startup_deadline: Option<Instant>,
    run_seq: u64,
}

impl Actor {
    async fn run(mut self) {
        debug!("core supervisor actor started");
        loop {
            let has_run = self.run.is_some();
            let startup_at = self.startup_deadline;
            let reconnect_at = self.reconnect_at;

            let wake = tokio::select! {
                biased;
                cmd = self.cmd_rx.recv() => Wake::Cmd(cmd),
                Some(line) = self.line_rx.recv() => Wake::Line(line),
                status = wait_exit(&mut self.run), if has_run => Wake::Exited(status),
                () = sleep_until(startup_at.unwrap_or_else(Instant::now)), if startup_at.is_some() => {
                    Wake::StartupDeadline
                }
                () = sleep_until(reconnect_at.unwrap_or_else(Instant::now)), if reconnect_at.is_some() => {
                    Wake::ReconnectDue
                }
            };

            match wake {
                Wake::Cmd(Some(request)) => self.handle_request(request).await,
                Wake::Cmd(None) => {
                    self.teardown().await;
                    break;
                }
                Wake::Line(line) => self.handle_line(&line),
                Wake::Exited(status) => self.handle_exit(&status),
                Wake::StartupDeadline => self.handle_startup_timeout().await,
                Wake::ReconnectDue => self.handle_reconnect_due().await,
            }
        }
        debug!("core supervisor actor exited");
    }

    async fn handle_request(&mut self, request: Request) {
        match request {
            Request::Start { req, reply } => {
                let result = if self.state == SupervisorState::Idle {
                    self.stop_requested = false;
                    self.retry_attempt = 0;
                    self.spawn_run(req).await
                } else {
                    Err(SupervisorError::AlreadyRunning)
                };
                if let Err(ref e) = result {
                    self.emit_error(e);
                }
                let _ = reply.send(result);
            }
            Request::Stop { reply } => {
                self.handle_stop().await;
                let _ = reply.send(());
            }
            Request::Status { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn snapshot(&self) -> SupervisorStatus {
        SupervisorStatus {
            state: self.state,
            control_addr: self
                .run
                .as_ref()
                .and_then(|active| active.control_addr.clone()),
            pid: self.run.as_ref().and_then(|active| active.pid),
            config_path: self
                .run
                .as_ref()
                .map(|active| active.artifact.path().to_path_buf()),
            retry_attempt: self.retry_attempt,
        }
    }

    /// Validate, materialize and spawn one run. On success the state is
    /// `Starting` and the startup deadline is armed.
    async fn spawn_run(&mut self, req: RunRequest) -> Result<(), SupervisorError> {
        let exe = locate::resolve_core_executable(self.cfg.executable.as_deref())?;

        req.profile
            .validate()
            .map_err(|e| SupervisorError::InvalidProfile {
                reason: e.to_string(),
            })?;

        let config_bytes = self
            .builder
            .materialize_config(&req.profile, &req.settings, req.tun_mode)
            .await
            .map_err(|e| SupervisorError::ConfigMaterializationFailed(e.to_string()))?;

        self.run_seq += 1;
        let artifact = ConfigArtifact::write(&config_bytes, self.run_seq)
            .map_err(|e| SupervisorError::ConfigMaterializationFailed(e.to_string()))?;

        info!(
            exe = %exe.display(),
            config = %artifact.path().display(),
            profile = %req.profile.display_address(),
            tun = req.tun_mode,
            "starting core"
        );

        let mut command = tokio::process::Command::new(&exe);
        command
            .arg("-c")
            .arg(artifact.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // A spawn failure drops `artifact` here, removing the file.
        let mut child = command
            .spawn()
            .map_err(|e| SupervisorError::ProcessError(format!("failed to spawn core: {e}")))?;

        let run_id = self.run_seq;
        if let Some(stdout) = child.stdout.take() {
            stream::spawn_stream_reader(stdout, StreamSource::Primary, run_id, self.line_tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            stream::spawn_stream_reader(
                stderr,
                StreamSource::Diagnostic,
                run_id,
                self.line_tx.clone(),
            );
        }

        let pid = child.id();
        debug!(?pid, run_id, "core spawned");

        self.run = Some(ActiveRun {
            child,
            pid,
            artifact,
            control_addr: None,
            run_id,
        });
        self.last_request = Some(req);
        self.startup_deadline = Some(Instant::now() + self.cfg.startup_timeout);
        self.state = SupervisorState::Starting;
        Ok(())
    }

    /// Caller-requested stop: graceful quit, bounded escalation, cleanup.
    /// No-op when idle; cancels a pending reconnect.
    async fn handle_stop(&mut self) {
        self.reconnect_at = None;
        self.startup_deadline = None;
        self.retry_attempt = 0;

        let Some(mut active) = self.run.take() else {
            if self.state != SupervisorState::Idle {
                info!("stop requested; pending reconnect cancelled");
                self.state = SupervisorState::Idle;
            }
            return;
        };

        // Captured before any termination so the exit can never be
        // classified as a crash, whatever the platform reports.
        self.stop_requested = true;
        self.state = SupervisorState::Stopping;

        let exited_gracefully = match active.control_addr.as_deref() {
            Some(addr) if !addr.is_empty() => {
                debug!(%addr, "requesting graceful core shutdown");
                let ((), waited) = tokio::join!(
                    control::request_quit(addr),
                    timeout(self.cfg.graceful_wait, active.child.wait()),
                );
                waited.is_ok()
            }
            _ => false,
        };

        if !exited_gracefully {
            debug!(pid = ?active.pid, "escalating to forced termination");
            if let Err(e) = shutdown::shutdown_child(
                &mut active.child,
                self.cfg.terminate_wait,
                self.cfg.kill_wait,
            )
            .await
            {
                warn!(error = %e, "forced core termination failed");
            }
        }

        // Dropping the run clears the control address and removes the
        // config artifact.
        drop(active);
        self.stop_requested = false;
        self.state = SupervisorState::Idle;
        info!("core stopped");
        self.emit(CoreEvent::Stopped);
    }

    /// The child exited on its own (any state that still owns a run).
    fn handle_exit(&mut self, status: &io::Result<ExitStatus>) {
        let Some(active) = self.run.take() else {
            return;
        };
        self.startup_deadline = None;
        let confirmed = self.state == SupervisorState::Running;

        let abnormal = match status {
            Ok(st) => {
                info!(exit = %st, pid = ?active.pid, "core process exited");
                !st.success()
            }
            Err(e) => {
                warn!(error = %e, "failed to collect core exit status");
                true
            }
        };

        drop(active); // removes the config artifact
        self.emit(CoreEvent::Stopped);

        if self.stop_requested {
            // Termination we issued ourselves; never a crash.
            self.state = SupervisorState::Idle;
            return;
        }

        if abnormal {
            self.emit_error(&SupervisorError::ProcessCrashed);
            self.schedule_reconnect();
        } else if !confirmed && self.retry_attempt > 0 {
            // A reconnect attempt that quit cleanly before readiness still
            // failed to reach Running: it consumes budget like a crash.
            self.schedule_reconnect();
        } else {
            if !confirmed {
                self.emit_error(&SupervisorError::ProcessError(
                    "core exited before signalling readiness".to_string(),
                ));
            }
            self.retry_attempt = 0;
            self.state = SupervisorState::Idle;
        }
    }

    /// The core failed to announce its control endpoint in time.
    async fn handle_startup_timeout(&mut self) {
        self.startup_deadline = None;
        let Some(mut active) = self.run.take() else {
            return;
        };

        warn!(pid = ?active.pid, "core did not confirm startup in time; discarding");
        if let Err(e) = shutdown::shutdown_child(
            &mut active.child,
            self.cfg.terminate_wait,
            self.cfg.kill_wait,
        )
        .await
        {
            warn!(error = %e, "failed to terminate unconfirmed core");
        }
        drop(active);

        self.emit_error(&SupervisorError::StartupTimeout(self.cfg.startup_timeout));

        if self.retry_attempt > 0 {
            self.schedule_reconnect();
        } else {
            self.state = SupervisorState::Idle;
        }
    }

    /// Classify the just-failed attempt and either arm the next backoff
    /// or abandon reconnection.
    fn schedule_reconnect(&mut self) {
        let failed_attempts = self.retry_attempt;
        let policy = self.cfg.retry;

        if policy.is_exhausted(failed_attempts) {
            warn!(attempts = failed_attempts, "reconnection abandoned");
            self.emit(CoreEvent::ReconnectAbandoned);
            self.retry_attempt = 0;
            self.state = SupervisorState::Idle;
            return;
        }

        let attempt = failed_attempts + 1;
        let delay = policy.delay_for(attempt);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        info!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms,
            "reconnect scheduled"
        );
        self.emit(CoreEvent::ReconnectScheduled {
            attempt,
            max_attempts: policy.max_attempts,
            delay_ms,
        });
        self.retry_attempt = attempt;
        self.reconnect_at = Some(Instant::now() + delay);
        self.state = SupervisorState::Reconnecting;
    }

    /// The backoff timer fired: replay the stored request.
    async fn handle_reconnect_due(&mut self) {
        self.reconnect_at = None;
        let attempt = self.retry_attempt;
        info!(attempt, "attempting core reconnect");
        self.emit(CoreEvent::ReconnectAttempting {
            attempt,
            max_attempts: self.cfg.retry.max_attempts,
        });

        let Some(req) = self.last_request.clone() else {
            warn!("no stored run request; abandoning reconnect");
            self.retry_attempt = 0;
            self.state = SupervisorState::Idle;
            return;
        };

        match self.spawn_run(req).await {
            Ok(()) => {}
            Err(e) => {
                // A start failure during reconnection consumes the same
                // retry budget as a crash.
                self.emit_error(&e);
                self.schedule_reconnect();
            }
        }
    }

    /// Stdout/stderr line from a reader task.
    fn handle_line(&mut self, line: &OutputLine) {
        let demuxed = stream::demux(line.source, &line.text);
        self.emit(CoreEvent::Log {
            line: demuxed.log_line,
        });

        let Some(addr) = demuxed.control_addr else {
            return;
        };
        let confirmed = match self.run.as_mut() {
            // Only the current run may announce; stale reader output is
            // just a log line.
            Some(active) if active.run_id == line.run_id => {
                debug!(%addr, "discovered control address");
                active.control_addr = Some(addr.clone());
                self.state == SupervisorState::Starting
            }
            _ => false,
        };
        if confirmed {
            self.confirm_started(addr);
        }
    }

    fn confirm_started(&mut self, control_addr: String) {
        self.startup_deadline = None;
        self.retry_attempt = 0;
        self.state = SupervisorState::Running;
        info!(%control_addr, "core confirmed startup");
        self.emit(CoreEvent::Started { control_addr });
    }

    /// Last handle dropped: force-terminate anything live and clean up.
    async fn teardown(&mut self) {
        self.reconnect_at = None;
        self.startup_deadline = None;
        if let Some(mut active) = self.run.take() {
            debug!(pid = ?active.pid, "supervisor dropped with live core; force terminating");
            if let Err(e) = active.child.kill().await {
                debug!(error = %e, "teardown kill failed");
            }
        }
    }

    fn emit(&self, event: CoreEvent) {
        // Send only fails with no subscribers, which is fine.
        let _ = self.events.send(event);
    }

    fn emit_error(&self, err: &SupervisorError) {
        warn!(kind = err.kind(), error = %err, "core supervisor error");
        self.emit(CoreEvent::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        });
    }
}

/// Resolves when the active child exits; pending forever when idle (the
/// select arm is additionally gated on `run.is_some()`).
async fn wait_exit(run: &mut Option<ActiveRun>) -> io::Result<ExitStatus> {
    match run.as_mut() {
        Some(active) => active.child.wait().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ewp_client_core::ports::ConfigBuildError;

    /// Builder returning a fixed document.
    struct StaticBuilder;

    #[async_trait]
    impl ConfigBuilderPort for StaticBuilder {
        async fn materialize_config(
            &self,
            _profile: &ConnectionProfile,
            _settings: &AppSettings,
            _tun_mode: bool,
        ) -> Result<Vec<u8>, ConfigBuildError> {
            Ok(b"{}".to_vec())
        }
    }

    /// Builder that always fails.
    struct FailingBuilder;

    #[async_trait]
    impl ConfigBuilderPort for FailingBuilder {
        async fn materialize_config(
            &self,
            _profile: &ConnectionProfile,
            _settings: &AppSettings,
            _tun_mode: bool,
        ) -> Result<Vec<u8>, ConfigBuildError> {
            Err(ConfigBuildError::Serialization("boom".to_string()))
        }
    }

    fn valid_profile() -> ConnectionProfile {
        ConnectionProfile {
            name: "test".to_string(),
            server_address: "example.com".to_string(),
            uuid: "uuid-1234".to_string(),
            ..ConnectionProfile::default()
        }
    }

    fn request() -> RunRequest {
        RunRequest::new(valid_profile(), AppSettings::default())
    }

    #[tokio::test]
    async fn initial_state_is_idle() {
        let supervisor = CoreSupervisor::new(SupervisorConfig::default(), Arc::new(StaticBuilder));
        let status = supervisor.status().await;
        assert_eq!(status.state, SupervisorState::Idle);
        assert_eq!(status.control_addr, None);
        assert_eq!(status.retry_attempt, 0);
        assert!(!supervisor.is_running().await);
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_noop() {
        let supervisor = CoreSupervisor::new(SupervisorConfig::default(), Arc::new(StaticBuilder));
        supervisor.stop().await;
        supervisor.stop().await;
        supervisor.stop().await;
        assert_eq!(supervisor.status().await.state, SupervisorState::Idle);
    }

    #[tokio::test]
    async fn missing_executable_fails_before_validation() {
        let config = SupervisorConfig {
            executable: Some(PathBuf::from("/nonexistent/ewp-core-client")),
            ..SupervisorConfig::default()
        };
        let supervisor = CoreSupervisor::new(config, Arc::new(StaticBuilder));
        let err = supervisor.start(request()).await.unwrap_err();
        assert!(matches!(err, SupervisorError::ExecutableNotFound { .. }));
        assert_eq!(supervisor.status().await.state, SupervisorState::Idle);
    }

    #[tokio::test]
    async fn invalid_profile_is_rejected_synchronously() {
        // Use a real file as the "executable" so validation is what fails.
        let fake_exe = tempfile::NamedTempFile::new().unwrap();
        let config = SupervisorConfig {
            executable: Some(fake_exe.path().to_path_buf()),
            ..SupervisorConfig::default()
        };
        let supervisor = CoreSupervisor::new(config, Arc::new(StaticBuilder));

        let mut req = request();
        req.profile.server_address.clear();
        let err = supervisor.start(req).await.unwrap_err();
        assert!(matches!(err, SupervisorError::InvalidProfile { .. }));

        let status = supervisor.status().await;
        assert_eq!(status.state, SupervisorState::Idle);
        assert_eq!(status.pid, None);
        assert_eq!(status.config_path, None);
    }

    #[tokio::test]
    async fn builder_failure_maps_to_config_materialization() {
        let fake_exe = tempfile::NamedTempFile::new().unwrap();
        let config = SupervisorConfig {
            executable: Some(fake_exe.path().to_path_buf()),
            ..SupervisorConfig::default()
        };
        let supervisor = CoreSupervisor::new(config, Arc::new(FailingBuilder));
        let err = supervisor.start(request()).await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::ConfigMaterializationFailed(_)
        ));
        assert_eq!(supervisor.status().await.state, SupervisorState::Idle);
    }

    #[tokio::test]
    async fn start_errors_are_also_broadcast() {
        let config = SupervisorConfig {
            executable: Some(PathBuf::from("/nonexistent/ewp-core-client")),
            ..SupervisorConfig::default()
        };
        let supervisor = CoreSupervisor::new(config, Arc::new(StaticBuilder));
        let mut events = supervisor.subscribe();

        let _ = supervisor.start(request()).await;
        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            CoreEvent::Error { ref kind, .. } if kind == "executableNotFound"
        ));
    }
}
