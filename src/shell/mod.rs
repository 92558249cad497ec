//! Shell orchestrator
//!
//! [`WrapperShell`] is observable like any other wrapper and observes the
//! child processes it spawns. While it has no children, input lines are
//! interpreted (built-ins or a new external command); while children are
//! running, input is forwarded to them verbatim.
//!
//! Locks: the child set, the line buffer and the listener set are each
//! guarded separately and no path holds two of them at once. Children are
//! always dropped after the child-set lock is released.
//!
//! Child callbacks arrive on different threads (text-ready from the child's
//! alert loop, finished from its exit watcher). Both run their whole
//! check-drain-absorb sequence under the hand-off lock, which is taken
//! first and released before any child is dropped.

pub mod builtins;
pub mod context;

pub use builtins::{Command, CD_USAGE, VIEW_USAGE};
pub use context::{resolve_directory, resolve_file, resolve_path, tokenize, ShellContext};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ConsoleLine, LineKind};
use crate::process::{ProcessSpec, ProcessWrapper};
use crate::wrapper::{lock, Wrapper, WrapperCore, WrapperId, WrapperListener};
use std::env;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

pub struct WrapperShell {
    core: WrapperCore,
    context: ShellContext,
    children: Mutex<Vec<Arc<ProcessWrapper>>>,
    handoff: Mutex<()>,
    config: Config,
    self_ref: Weak<WrapperShell>,
}

impl WrapperShell {
    /// Start in the configured directory, or the launching directory
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let directory = match &config.shell.working_directory {
            Some(dir) => dir.clone(),
            None => env::current_dir()?,
        };
        Self::with_directory(&directory, config)
    }

    /// Start in `directory`; the initial prompt is the pending fragment
    pub fn with_directory(directory: &Path, config: Config) -> Result<Arc<Self>> {
        let context = ShellContext::open(directory)?;

        let shell = Arc::new_cyclic(|weak: &Weak<WrapperShell>| {
            let source: Weak<dyn Wrapper> = weak.clone();
            Self {
                core: WrapperCore::new(source, &config.alerts),
                context,
                children: Mutex::new(Vec::new()),
                handoff: Mutex::new(()),
                config,
                self_ref: weak.clone(),
            }
        });

        shell.show_prompt();
        debug!("Shell {} started in {}", shell.id(), shell.current_directory().display());
        Ok(shell)
    }

    pub fn current_directory(&self) -> PathBuf {
        self.context.working_directory()
    }

    /// `"<cwd>"` followed by the configured suffix
    pub fn prompt(&self) -> String {
        format!(
            "{}{}",
            self.current_directory().display(),
            self.config.shell.prompt_suffix
        )
    }

    pub fn child_count(&self) -> usize {
        lock(&self.children).len()
    }

    /// Whether input is currently forwarded to children
    pub fn is_delegating(&self) -> bool {
        self.child_count() > 0
    }

    /// Terminate every child and stop notifying listeners
    pub fn shutdown(&self) {
        let children = mem::take(&mut *lock(&self.children));
        if !children.is_empty() {
            debug!("Shell {} terminating {} child(ren)", self.id(), children.len());
        }
        for child in &children {
            child.terminate();
        }
        drop(children);
        self.core.shutdown();
    }

    fn show_prompt(&self) {
        self.core.set_fragment(self.prompt());
    }

    /// Complete the pending prompt with the typed line
    fn echo(&self, text: &str) {
        self.core.append(&format!("{}\n", text), LineKind::Normal);
    }

    fn error_line(&self, message: &str) {
        self.core.append(&format!("{}\n", message), LineKind::Error);
    }

    fn report(&self, result: Result<()>) {
        if let Err(e) = result {
            self.error_line(&e.to_string());
        }
    }

    fn interpret(&self, text: &str) {
        let command = Command::parse(text);
        if command.is_builtin() {
            trace!("Shell {} built-in '{}'", self.id(), command.name());
        }

        match &command {
            Command::Exit => {
                debug!("Shell {} received exit", self.id());
                self.core.notify_finished(self);
            }
            Command::Empty => {
                self.echo(text);
                self.show_prompt();
            }
            Command::ChangeDirectory(target) => {
                self.echo(text);
                self.report(self.change_directory(&command, target.as_deref()));
                self.show_prompt();
            }
            Command::View(args) => {
                self.echo(text);
                self.report(self.view(&command, args));
                self.show_prompt();
            }
            Command::External(line) => {
                self.echo(text);
                if let Err(e) = self.spawn(line) {
                    warn!("{}", e);
                    self.error_line(&e.to_string());
                    self.show_prompt();
                }
            }
        }
    }

    fn change_directory(&self, command: &Command, target: Option<&str>) -> Result<()> {
        let target = target.ok_or_else(|| command.usage_error())?;
        self.context.change_directory(target)?;
        Ok(())
    }

    fn view(&self, command: &Command, args: &[String]) -> Result<()> {
        let [target] = args else {
            return Err(command.usage_error());
        };

        let path = context::resolve_file(&self.current_directory(), target).map_err(|_| {
            Error::ImageNotFound {
                path: target.clone(),
            }
        })?;
        self.core.append(&path.to_string_lossy(), LineKind::Image);
        Ok(())
    }

    /// Launch `line` through the command interpreter and adopt the child
    fn spawn(&self, line: &str) -> Result<()> {
        let spec =
            ProcessSpec::shell_command(line, &self.current_directory(), &self.config.process);
        let listener: Weak<dyn WrapperListener> = self.self_ref.clone();

        // Held across start so a fast exit cannot report before adoption
        let mut children = lock(&self.children);
        let child = ProcessWrapper::start(spec, vec![listener], &self.config)?;
        debug!("Shell {} delegating to pid {}", self.id(), child.pid());
        children.push(child);
        Ok(())
    }

    fn is_child(&self, id: WrapperId) -> bool {
        lock(&self.children).iter().any(|child| child.id() == id)
    }

    /// Remove `source` from the child set and take its remaining output.
    ///
    /// Returns the removed children so they are dropped outside every lock.
    fn adopt_final_output(&self, source: &dyn Wrapper) -> Vec<Arc<ProcessWrapper>> {
        let id = source.id();
        let (removed, now_idle) = {
            let mut children = lock(&self.children);
            let (removed, kept): (Vec<_>, Vec<_>) =
                mem::take(&mut *children).into_iter().partition(|c| c.id() == id);
            *children = kept;
            (removed, children.is_empty())
        };

        if removed.is_empty() {
            return removed;
        }

        let lines = source.drain_text();
        if now_idle {
            self.core.absorb(lines, self.prompt());
            debug!("Shell {} idle again", self.id());
        } else {
            self.core.extend_lines(lines);
        }
        removed
    }
}

impl Wrapper for WrapperShell {
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

    fn send_line(&self, text: &str, kind: LineKind) {
        {
            let children = lock(&self.children);
            if !children.is_empty() {
                for child in children.iter() {
                    child.send_line(text, kind);
                }
                return;
            }
        }

        self.core.set_next_kind(kind);
        self.interpret(text);
    }

    fn send_character(&self, ch: char, flush: bool) {
        let children = lock(&self.children);
        if children.is_empty() {
            trace!("Shell {} ignoring character with no children", self.id());
        }
        for child in children.iter() {
            child.send_character(ch, flush);
        }
    }

    fn send(&self, text: &str, flush: bool) {
        let children = lock(&self.children);
        if children.is_empty() {
            trace!("Shell {} ignoring raw input with no children", self.id());
        }
        for child in children.iter() {
            child.send(text, flush);
        }
    }
}

impl WrapperListener for WrapperShell {
    fn on_text_ready(&self, source: &dyn Wrapper) {
        let _handoff = lock(&self.handoff);
        // A child removed by on_finished has already been drained
        if !self.is_child(source.id()) {
            return;
        }

        let lines = source.drain_text();
        let fragment = source.current_fragment();
        self.core.absorb(lines, fragment);
    }

    fn on_finished(&self, source: &dyn Wrapper) {
        let removed = {
            let _handoff = lock(&self.handoff);
            self.adopt_final_output(source)
        };
        drop(removed);
    }
}

impl Drop for WrapperShell {
    fn drop(&mut self) {
        self.shutdown();
    }
}
