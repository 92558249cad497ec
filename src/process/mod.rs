//! Child process adapter
//!
//! A [`ProcessWrapper`] owns one spawned child. Stdout and stderr are pumped
//! on reader threads into the wrapper's line buffer (stdout as Normal lines,
//! stderr as Error lines, sharing one fragment); input goes through a
//! writer thread. A watcher thread polls for exit, waits a bounded time for
//! both readers to reach EOF, then completes the wrapper: the fragment is
//! promoted to a final line and listeners hear `on_finished` exactly once.

pub mod streams;

pub use streams::{spawn_reader, spawn_writer, InputMessage, Utf8Decoder};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ConsoleLine, LineKind, ProcessInfo};
use crate::platform::Platform;
use crate::wrapper::{lock, Wrapper, WrapperCore, WrapperId, WrapperListener};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

/// What to launch and where
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    pub env: HashMap<String, String>,
    pub inherit_env: bool,
    /// Command line as the user typed it, for messages and logs
    pub display: String,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, working_directory: &Path) -> Self {
        let program = program.into();
        let display = std::iter::once(program.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program,
            args,
            working_directory: working_directory.to_path_buf(),
            env: HashMap::new(),
            inherit_env: true,
            display,
        }
    }

    /// `<interpreter> <flag> <command_line>` using the configured interpreter
    pub fn shell_command(
        command_line: &str,
        working_directory: &Path,
        config: &crate::config::ProcessConfig,
    ) -> Self {
        let mut spec = Self::new(
            config.interpreter(),
            vec![config.command_flag(), command_line.to_string()],
            working_directory,
        );
        spec.env = config.environment.clone();
        spec.inherit_env = config.inherit_env;
        spec.display = command_line.to_string();
        spec
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if !self.inherit_env {
            command.env_clear();
        }
        command.envs(&self.env);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so teardown reaches grandchildren
            command.process_group(0);
        }

        command
    }
}

/// Observable adapter around one child process
pub struct ProcessWrapper {
    core: WrapperCore,
    info: Mutex<ProcessInfo>,
    child: Mutex<Option<Child>>,
    input: Mutex<Option<Sender<InputMessage>>>,
    /// Dropping this wakes the watcher so it exits promptly
    stop: Mutex<Option<Sender<()>>>,
    /// Set once the watcher has reaped the child; its pid may be reused
    exited: AtomicBool,
    finished: AtomicBool,
    pid: u32,
}

impl ProcessWrapper {
    /// Launch `spec`, registering `listeners` before any output can arrive
    pub fn start(
        spec: ProcessSpec,
        listeners: Vec<Weak<dyn WrapperListener>>,
        config: &Config,
    ) -> Result<Arc<Self>> {
        let mut child = spec.to_command().spawn().map_err(|e| Error::SpawnFailed {
            command: spec.display.clone(),
            reason: e.to_string(),
        })?;

        let pid = child.id();
        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (stdin, stdout, stderr) = match pipes {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            (stdin, stdout, _) => {
                let _ = child.kill();
                let _ = child.wait();
                let stream = if stdin.is_none() {
                    "stdin"
                } else if stdout.is_none() {
                    "stdout"
                } else {
                    "stderr"
                };
                return Err(Error::StreamUnavailable { stream });
            }
        };

        let mut info = ProcessInfo::new(
            spec.display.clone(),
            spec.args.clone(),
            spec.working_directory.clone(),
        );
        info.mark_started(pid);
        info!("Spawned '{}' (pid {})", spec.display, pid);

        let (input_tx, input_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();

        let wrapper = Arc::new_cyclic(|weak: &Weak<ProcessWrapper>| {
            let source: Weak<dyn Wrapper> = weak.clone();
            Self {
                core: WrapperCore::new(source, &config.alerts),
                info: Mutex::new(info),
                child: Mutex::new(Some(child)),
                input: Mutex::new(Some(input_tx)),
                stop: Mutex::new(Some(stop_tx)),
                exited: AtomicBool::new(false),
                finished: AtomicBool::new(false),
                pid,
            }
        });

        for listener in listeners {
            wrapper.core.add_listener(listener);
        }

        if let Err(e) = wrapper.start_threads(stdin, stdout, stderr, input_rx, stop_rx, config) {
            wrapper.terminate();
            return Err(Error::SpawnFailed {
                command: spec.display,
                reason: e.to_string(),
            });
        }

        Ok(wrapper)
    }

    fn start_threads(
        self: &Arc<Self>,
        stdin: std::process::ChildStdin,
        stdout: std::process::ChildStdout,
        stderr: std::process::ChildStderr,
        input_rx: Receiver<InputMessage>,
        stop_rx: Receiver<()>,
        config: &Config,
    ) -> std::io::Result<()> {
        let buffer_size = config.process.read_buffer_size;
        // Readers never send; the watcher sees Disconnected once both exit
        let (drained_tx, drained_rx) = mpsc::channel::<()>();

        spawn_writer(&format!("stdin-{}", self.pid), stdin, input_rx)?;

        let weak = Arc::downgrade(self);
        let token = drained_tx.clone();
        spawn_reader(&format!("stdout-{}", self.pid), stdout, buffer_size, move |text| {
            let _held = &token;
            match weak.upgrade() {
                Some(wrapper) => wrapper.receive_output(text, LineKind::Normal),
                None => false,
            }
        })?;

        let weak = Arc::downgrade(self);
        let token = drained_tx;
        spawn_reader(&format!("stderr-{}", self.pid), stderr, buffer_size, move |text| {
            let _held = &token;
            match weak.upgrade() {
                Some(wrapper) => wrapper.receive_output(text, LineKind::Error),
                None => false,
            }
        })?;

        let weak = Arc::downgrade(self);
        let poll_interval = config.process.exit_poll_interval();
        let drain_timeout = config.process.drain_timeout();
        thread::Builder::new()
            .name(format!("shellwrap-watch-{}", self.pid))
            .spawn(move || watch(weak, stop_rx, drained_rx, poll_interval, drain_timeout))?;

        Ok(())
    }

    /// Append reader output; returns `false` once the wrapper has finished
    fn receive_output(&self, text: &str, kind: LineKind) -> bool {
        if self.finished.load(Ordering::SeqCst) {
            trace!("Discarding output after pid {} finished", self.pid);
            return false;
        }
        self.core.append(text, kind);
        true
    }

    /// Non-blocking exit check; `Some(code)` once the child has exited
    fn poll_exit(&self) -> Option<Option<i32>> {
        let mut child = lock(&self.child);
        let running = child.as_mut()?;
        let exit = match running.try_wait() {
            Ok(Some(status)) => Some(status.code()),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to poll pid {}: {}", self.pid, e);
                Some(None)
            }
        };
        if exit.is_some() {
            self.exited.store(true, Ordering::SeqCst);
        }
        exit
    }

    /// Promote the fragment, record the exit and notify listeners once
    fn complete(&self, exit_code: Option<i32>) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }

        self.core.flush_fragment(LineKind::Normal);
        lock(&self.info).mark_terminated(exit_code);
        lock(&self.input).take();
        info!("Process {} exited with {:?}", self.pid, exit_code);

        self.core.notify_finished(self);
    }

    /// Stop the child and its process group: SIGTERM, then SIGKILL.
    ///
    /// Completion is still reported through `on_finished` once the watcher
    /// observes the exit.
    pub fn terminate(&self) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }

        lock(&self.input).take();

        // The watcher reaps under this lock, so `exited` cannot flip mid-signal
        let mut child = lock(&self.child);

        // Once reaped, the pid no longer names our group
        if !self.exited.load(Ordering::SeqCst) {
            let signals = Platform::signals();
            if let Err(e) = signals.terminate_group(self.pid) {
                debug!("Group terminate for pid {} failed: {}", self.pid, e);
            }
            if let Err(e) = signals.kill_group(self.pid) {
                debug!("Group kill for pid {} failed: {}", self.pid, e);
            }
        }

        if let Some(running) = child.as_mut() {
            if let Err(e) = running.kill() {
                // Already exited
                debug!("Kill for pid {} failed: {}", self.pid, e);
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn info(&self) -> ProcessInfo {
        lock(&self.info).clone()
    }

    /// Whether the child has been reaped; output may still be draining
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.core.listener_count()
    }
}

fn watch(
    wrapper: Weak<ProcessWrapper>,
    stop: Receiver<()>,
    drained: Receiver<()>,
    poll_interval: Duration,
    drain_timeout: Duration,
) {
    let exit_code = loop {
        match stop.recv_timeout(poll_interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                trace!("Watcher stopped by owner");
                return;
            }
        }

        let Some(strong) = wrapper.upgrade() else {
            return;
        };
        if let Some(code) = strong.poll_exit() {
            break code;
        }
    };

    match drained.recv_timeout(drain_timeout) {
        Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
        Err(RecvTimeoutError::Timeout) => {
            warn!("Output readers still open {:?} after exit", drain_timeout);
        }
    }

    if let Some(strong) = wrapper.upgrade() {
        strong.complete(exit_code);
    }
}

impl Wrapper for ProcessWrapper {
    fn id(&self) -> WrapperId {
        self.core.id()
    }

    fn add_listener(&self, listener: Weak<dyn WrapperListener>) {
        self.core.add_listener(listener);
    }

    fn drain_text(&self) -> Vec<ConsoleLine> {
        self.core.drain()
    }

    fn peek_text(&self) -> Vec<ConsoleLine> {
        self.core.peek()
    }

    fn current_fragment(&self) -> String {
        self.core.fragment()
    }

    fn send_line(&self, text: &str, _kind: LineKind) {
        self.send(&format!("{}\n", text), true);
    }

    fn send_character(&self, ch: char, flush: bool) {
        let mut buf = [0u8; 4];
        self.send(ch.encode_utf8(&mut buf), flush);
    }

    fn send(&self, text: &str, flush: bool) {
        let input = lock(&self.input);
        let Some(sender) = input.as_ref() else {
            debug!("Input for pid {} dropped: stdin closed", self.pid);
            return;
        };

        let message = InputMessage {
            data: text.as_bytes().to_vec(),
            flush,
        };
        if sender.send(message).is_err() {
            debug!("Input for pid {} dropped: writer exited", self.pid);
        }
    }
}

impl Drop for ProcessWrapper {
    fn drop(&mut self) {
        lock(&self.stop).take();
        self.terminate();

        if !self.finished.load(Ordering::SeqCst) {
            if let Some(mut child) = lock(&self.child).take() {
                // Reap; the child was just killed
                let _ = child.wait();
            }
        }
        self.core.shutdown();
    }
}
