//! Command-based source fetcher

use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use wopr_core::{Fetch, FetchError};

use super::payload::JsonPayload;

/// Default time budget of one fetch
pub const DEFAULT_TIMEOUT_S: u32 = 10;

/// Default JSON field holding the temperature
pub const DEFAULT_TEMPERATURE_FIELD: &str = "temp";

/// How often a running command is checked for completion
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How to fetch one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    /// Program and arguments; empty means unconfigured
    pub argv: Vec<String>,
    /// Kill the command after this many seconds
    pub timeout_s: u32,
    /// Field to read the temperature from, for the tracking source only
    pub temperature_field: Option<String>,
}

/// Source fetched by running a command
///
/// The command runs in its own process group. On timeout the whole group
/// is killed, including anything the command left running in the
/// background with stdout still open.
#[derive(Debug, Clone)]
pub struct CommandSource {
    name: String,
    config: CommandConfig,
}

impl CommandSource {
    pub fn new(name: &str, config: CommandConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
        }
    }

    fn spawn(&self) -> Result<Child, FetchError> {
        let (program, args) = self
            .config
            .argv
            .split_first()
            .ok_or_else(|| FetchError::Unconfigured(self.name.clone()))?;

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| FetchError::Transport(format!("{}: {}", program, e)))
    }

    /// Kill the command's process group and reap the command
    fn kill_group(&self, child: &mut Child) {
        let pgid = child.id() as libc::pid_t;
        // SAFETY: kill(2) only sends a signal. The group id is the pid of
        // our own child, which stays unreaped (and so unrecycled) until the
        // wait below, or was reaped by us while its group lives on.
        let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
        if rc != 0 {
            debug!("{}: process group {} already gone", self.name, pgid);
            let _ = child.kill();
        }
        let _ = child.wait();
    }

    fn timed_out(&self, child: &mut Child) -> FetchError {
        warn!(
            "{}: no result within {} s, killing",
            self.name, self.config.timeout_s
        );
        self.kill_group(child);
        FetchError::Timeout(self.config.timeout_s)
    }
}

impl Fetch<JsonPayload> for CommandSource {
    fn fetch(&self) -> Result<JsonPayload, FetchError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_s as u64);
        let mut child = self.spawn()?;
        debug!("{}: started pid {}", self.name, child.id());

        // Drain stdout concurrently so a chatty command cannot fill the pipe
        // and stall before exiting
        let Some(mut stdout) = child.stdout.take() else {
            self.kill_group(&mut child);
            return Err(FetchError::Transport("stdout not captured".into()));
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => return Err(self.timed_out(&mut child)),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    self.kill_group(&mut child);
                    return Err(FetchError::Transport(e.to_string()));
                }
            }
        };

        // Background descendants can hold stdout open past the command's exit
        let remaining = deadline.saturating_duration_since(Instant::now());
        let output = match rx.recv_timeout(remaining) {
            Ok(read) => read.map_err(|e| FetchError::Transport(e.to_string()))?,
            Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(&mut child)),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(FetchError::Transport("stdout reader stopped".into()))
            }
        };

        if !status.success() {
            return Err(FetchError::Status(status.code().unwrap_or(-1)));
        }

        JsonPayload::parse(&output, self.config.temperature_field.as_deref())
    }
}
