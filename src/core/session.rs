//! Session controller.
//!
//! Owns one interactive terminal session end to end: the lifecycle gate
//! that constructs the display widget and its addons exactly once, the
//! asynchronous prompt cycle against the command interpreter, launch-target
//! consumption, the context-menu handler, and teardown on close.
//!
//! The controller is driven reactively: the host calls
//! [`Session::grant`] as capability modules become available and
//! [`Session::evaluate`] on every relevant event (capability change,
//! closing flag, new launch target). Evaluation is idempotent; the gate's
//! state machine decides when anything actually happens.

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::addons::{AddonLoader, BundleLoader, LoadError};
use crate::core::cwd::{CwdHandle, CwdView};
use crate::core::editor::LineEditor;
use crate::core::launch::{self, ExtensionRegistry, LaunchDisposition};
use crate::core::lifecycle::{transition, Capabilities, GateAction, GateState};
use crate::interp::CommandInterpreter;
use crate::proc::{ProcessTable, SessionId};
use crate::ui::clipboard::Clipboard;
use crate::ui::context_menu::{ContextMenuHandler, MenuOutcome};
use crate::ui::resize::ResizeCoordinator;
use crate::ui::surface::{Container, DisplaySurface, SurfaceFactory};
use crate::vfs::Filesystem;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Bundles(#[from] LoadError),

    #[error(transparent)]
    Surface(#[from] crate::ui::surface::SurfaceError),
}

/// External capabilities a session is wired to.
pub struct Collaborators {
    pub procs: Arc<dyn ProcessTable>,
    pub vfs: Arc<dyn Filesystem>,
    pub interpreter: Arc<dyn CommandInterpreter>,
    pub surfaces: Arc<dyn SurfaceFactory>,
    pub container: Arc<dyn Container>,
    pub clipboard: Arc<dyn Clipboard>,
    pub bundles: Arc<dyn BundleLoader>,
}

/// One interactive terminal session.
pub struct Session {
    id: SessionId,
    config: Arc<Config>,
    procs: Arc<dyn ProcessTable>,
    vfs: Arc<dyn Filesystem>,
    interpreter: Arc<dyn CommandInterpreter>,
    surfaces: Arc<dyn SurfaceFactory>,
    container: Arc<dyn Container>,
    clipboard: Arc<dyn Clipboard>,
    addons: AddonLoader,
    registry: ExtensionRegistry,

    gate: GateState,
    caps: Capabilities,
    cwd: CwdHandle,
    username: String,
    hostname: String,

    surface: Option<Arc<dyn DisplaySurface>>,
    editor: Option<Arc<LineEditor>>,
    menu: Option<ContextMenuHandler>,
    focus_forwarding: bool,

    initial_command: Option<String>,
    prompted: bool,

    shutdown_tx: watch::Sender<bool>,
    loop_task: Option<JoinHandle<()>>,
    resize_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Create a session bound to a process-table id.
    ///
    /// `cwd` is the shared working-directory cell; the host hands the same
    /// handle to the command interpreter, which is its sole writer. The
    /// cell should be seeded with the configured home path.
    pub fn new(id: SessionId, config: Arc<Config>, cwd: CwdHandle, collab: Collaborators) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let registry = ExtensionRegistry::new(config.extensions.clone());
        let username = config.username();
        let hostname = config.hostname();
        Self {
            id,
            procs: collab.procs,
            vfs: collab.vfs,
            interpreter: collab.interpreter,
            surfaces: collab.surfaces,
            container: collab.container,
            clipboard: collab.clipboard,
            addons: AddonLoader::new(collab.bundles),
            registry,
            gate: GateState::Idle,
            caps: Capabilities::empty(),
            cwd,
            username,
            hostname,
            surface: None,
            editor: None,
            menu: None,
            focus_forwarding: false,
            initial_command: None,
            prompted: false,
            shutdown_tx,
            loop_task: None,
            resize_task: None,
            config,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current gate state.
    pub fn state(&self) -> GateState {
        self.gate
    }

    /// Whether the prompt cycle has started.
    pub fn prompted(&self) -> bool {
        self.prompted
    }

    /// The line editor, once constructed.
    pub fn editor(&self) -> Option<Arc<LineEditor>> {
        self.editor.clone()
    }

    /// Pending initial command (consumed by the first loop iteration).
    pub fn initial_command(&self) -> Option<&str> {
        self.initial_command.as_deref()
    }

    /// Record that a capability module became available.
    ///
    /// Call [`evaluate`](Self::evaluate) afterwards; granting alone never
    /// initializes anything.
    pub fn grant(&mut self, caps: Capabilities) {
        self.caps |= caps;
    }

    /// Re-evaluate the session against the process table.
    ///
    /// Consumes a pending launch target, then runs one lifecycle
    /// transition. Safe to call any number of times; a satisfied gate
    /// re-evaluates to a no-op.
    pub async fn evaluate(&mut self) {
        let record = self.procs.record(self.id).unwrap_or_default();

        // A target arriving together with the close signal is dead on
        // arrival; disposal must not observe its side effects.
        if !record.closing {
            if let Some(target) = record.launch_target.as_deref() {
                self.consume_launch_target(target);
            }
        }

        let (next, action) = transition(self.gate, self.caps, record.closing);
        self.gate = next;

        match action {
            GateAction::None => {}
            GateAction::Initialize => match self.initialize(&record.libraries).await {
                Ok(()) => {
                    self.gate = GateState::Initialized;
                    self.start_loop();
                }
                Err(e) => {
                    // Not fatal: drop back to Idle so the next evaluation
                    // retries once the environment recovers.
                    warn!(id = %self.id, "initialization failed: {e}");
                    self.gate = GateState::Idle;
                }
            },
            GateAction::Dispose => self.dispose(),
        }
    }

    /// Apply a launch target and clear it from the process table.
    ///
    /// With an active line editor the target text lands in the current
    /// input line. Before that, an extensionless target becomes the initial
    /// working directory, and a registered extension derives the initial
    /// command (overwriting a pending one). The target is cleared exactly
    /// once either way.
    fn consume_launch_target(&mut self, target: &str) {
        match launch::derive(target, self.editor.is_some(), &self.registry) {
            LaunchDisposition::InsertIntoInput(text) => {
                if let Some(editor) = &self.editor {
                    editor.insert_into_input(&text);
                }
            }
            LaunchDisposition::InitialCommand(command) => {
                debug!(id = %self.id, command, "derived initial command");
                self.initial_command = Some(command);
            }
            LaunchDisposition::InitialDirectory(dir) => {
                if !self.prompted {
                    self.cwd.set(dir);
                }
            }
            LaunchDisposition::None => {}
        }

        self.procs.clear_launch_target(self.id);
    }

    /// The one-shot initialization sequence.
    ///
    /// Everything is built on locals and committed at the end, so a failure
    /// part way through leaves the session exactly as it was.
    async fn initialize(&mut self, libraries: &BTreeSet<String>) -> Result<(), SessionError> {
        self.addons.ensure_loaded(libraries).await?;

        let surface = self.surfaces.create(&self.config.surface)?;
        let editor = Arc::new(LineEditor::new(surface.clone(), self.config.history_size));

        surface.open()?;
        surface.fit();
        self.container.set_scrollable_full_height();

        let menu = ContextMenuHandler::new(surface.clone(), editor.clone(), self.clipboard.clone());
        let resize_task = ResizeCoordinator::spawn(
            surface.clone(),
            self.container.size_events(),
            self.shutdown_tx.subscribe(),
        );

        self.surface = Some(surface);
        self.editor = Some(editor);
        self.menu = Some(menu);
        self.resize_task = Some(resize_task);
        self.focus_forwarding = true;

        self.procs.finish_loading(self.id);
        info!(id = %self.id, "session initialized");
        Ok(())
    }

    /// Start the prompt cycle, at most once.
    fn start_loop(&mut self) {
        if self.prompted {
            return;
        }
        let (Some(editor), Some(surface)) = (self.editor.clone(), self.surface.clone()) else {
            return;
        };
        self.prompted = true;

        let cx = LoopContext {
            editor,
            surface,
            interpreter: self.interpreter.clone(),
            vfs: self.vfs.clone(),
            cwd: self.cwd.view(),
            username: self.username.clone(),
            hostname: self.hostname.clone(),
            initial_command: self.initial_command.take(),
            shutdown: self.shutdown_tx.subscribe(),
        };
        debug!(id = %self.id, "starting prompt cycle");
        self.loop_task = Some(tokio::spawn(run_prompt_cycle(cx)));
    }

    /// Tear the session down. Sole teardown path; a session whose widget
    /// was never constructed has nothing to dispose.
    fn dispose(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(editor) = &self.editor {
            editor.abandon();
        }
        if let Some(surface) = self.surface.take() {
            info!(id = %self.id, "disposing session surface");
            surface.dispose();
        }
        self.menu = None;
        self.focus_forwarding = false;
    }

    /// Context-menu gesture on the container. Returns the outcome once the
    /// handler is armed, `None` before initialization.
    pub fn handle_context_menu(&self) -> Option<MenuOutcome> {
        self.menu.as_ref().map(ContextMenuHandler::invoke)
    }

    /// Focus event on the nearest ancestor scrollable region.
    pub fn notify_container_focus(&self) {
        if self.focus_forwarding {
            if let Some(surface) = &self.surface {
                surface.focus();
            }
        }
    }

    /// The window manager's foreground session changed.
    pub fn notify_foreground(&self, foreground: SessionId) {
        if foreground == self.id && self.gate == GateState::Initialized {
            if let Some(surface) = &self.surface {
                surface.focus();
            }
        }
    }

    /// Await the prompt cycle and resize coordinator after disposal.
    pub async fn join(&mut self) {
        if let Some(task) = self.loop_task.take() {
            let _ = task.await;
        }
        if let Some(task) = self.resize_task.take() {
            let _ = task.await;
        }
    }
}

/// Render the prompt for the current context.
pub fn render_prompt(username: &str, hostname: &str, cwd: &str) -> String {
    format!("{username}@{hostname}:{cwd}$ ")
}

struct LoopContext {
    editor: Arc<LineEditor>,
    surface: Arc<dyn DisplaySurface>,
    interpreter: Arc<dyn CommandInterpreter>,
    vfs: Arc<dyn Filesystem>,
    cwd: CwdView,
    username: String,
    hostname: String,
    initial_command: Option<String>,
    shutdown: watch::Receiver<bool>,
}

impl LoopContext {
    fn prompt(&self) -> String {
        render_prompt(&self.username, &self.hostname, &self.cwd.get())
    }
}

/// The read-evaluate loop for one session.
///
/// Strictly alternates between one suspended read and one suspended
/// execution; there is no normal termination, only the shutdown signal
/// checked at both suspension points (or an abandoned read when the widget
/// is disposed).
async fn run_prompt_cycle(mut cx: LoopContext) {
    cx.surface.focus();
    cx.surface.fit();

    match cx.vfs.list_directory(&cx.cwd.get()).await {
        Ok(entries) => cx.editor.set_candidates(entries),
        Err(e) => debug!("autocomplete listing failed: {e}"),
    }

    if let Some(command) = cx.initial_command.take() {
        cx.editor
            .println(&format!("\r\n{}{}", cx.prompt(), command));
        cx.editor.seed_history(&command);
        if execute_line(&mut cx, &command).await.is_break() {
            return;
        }
    }

    loop {
        let prompt = format!("\r\n{}", cx.prompt());
        let line = tokio::select! {
            _ = closed(&mut cx.shutdown) => break,
            line = cx.editor.read(&prompt) => match line {
                Ok(line) => line,
                // Pending read abandoned: the session is being torn down.
                Err(_) => break,
            },
        };

        if execute_line(&mut cx, &line).await.is_break() {
            break;
        }
    }
    debug!("prompt cycle ended");
}

/// Dispatch one line and wait for the interpreter to settle.
///
/// A failed command never breaks the cycle; only shutdown does.
async fn execute_line(cx: &mut LoopContext, line: &str) -> ControlFlow<()> {
    tokio::select! {
        _ = closed(&mut cx.shutdown) => ControlFlow::Break(()),
        result = cx.interpreter.execute(line) => {
            if let Err(e) = result {
                warn!(line, "command execution failed: {e}");
            }
            ControlFlow::Continue(())
        }
    }
}

/// Resolves when the shutdown flag flips true (or its sender is gone).
async fn closed(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|closing| *closing).await;
}
