//! termsurf - async terminal session controller.
//!
//! The binary wires the session controller to a stdout-backed display
//! surface, the local filesystem, and a tiny builtin interpreter, turning
//! the crate into a usable (if minimal) interactive shell:
//!
//! ```text
//! termsurf                 # start an interactive session
//! termsurf notes.txt       # derive an initial command from the target
//! termsurf --theme nord    # override the configured color theme
//! ```
//!
//! The interesting machinery (lifecycle gating, the prompt cycle, addon
//! loading, clipboard handling) lives in the library; everything here is
//! a stand-in collaborator.

use std::collections::BTreeSet;
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use termsurf::config::SurfaceProfile;
use termsurf::core::addons::StaticBundleLoader;
use termsurf::interp::InterpreterError;
use termsurf::ui::surface::{ContainerSize, SurfaceError};
use termsurf::ui::SystemClipboard;
use termsurf::vfs::VfsError;
use termsurf::{
    Capabilities, Collaborators, CommandInterpreter, Config, Container, CwdHandle, DisplaySurface,
    Filesystem, GateState, InMemoryProcessTable, Session, SessionId, SurfaceFactory,
};

/// Parsed command line
struct Args {
    /// Launch target (file path), if any
    target: Option<String>,
    /// Theme override
    theme: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        target: None,
        theme: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("termsurf {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--theme" => {
                args.theme = Some(
                    iter.next()
                        .ok_or_else(|| "--theme requires a name".to_string())?,
                );
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {}", other));
            }
            other => {
                if args.target.is_some() {
                    return Err("at most one launch target is accepted".to_string());
                }
                args.target = Some(other.to_string());
            }
        }
    }
    Ok(args)
}

fn print_usage() {
    println!("termsurf - async terminal session controller");
    println!();
    println!("USAGE:");
    println!("    termsurf [OPTIONS] [TARGET]");
    println!();
    println!("ARGS:");
    println!("    TARGET           Launch target; a registered extension derives an");
    println!("                     initial command, an extensionless path becomes the");
    println!("                     starting directory");
    println!();
    println!("OPTIONS:");
    println!("    --theme <NAME>   Color theme (ubuntu, dracula, nord)");
    println!("    -h, --help       Print help");
    println!("    -V, --version    Print version");
}

/// Display surface rendering straight to stdout.
struct StdoutSurface {
    disposed: AtomicBool,
}

impl StdoutSurface {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            disposed: AtomicBool::new(false),
        })
    }
}

impl DisplaySurface for StdoutSurface {
    fn open(&self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn write(&self, text: &str) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn focus(&self) {
        // stdout has no focus concept
    }

    fn fit(&self) {
        if let Ok((cols, rows)) = crossterm::terminal::size() {
            debug!(cols, rows, "fitted surface");
        }
    }

    fn selection(&self) -> Option<String> {
        None
    }

    fn clear_selection(&self) {}

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            println!();
        }
    }
}

/// Factory handing out the one pre-built stdout surface.
struct StdoutFactory {
    surface: Arc<StdoutSurface>,
    created: AtomicBool,
}

impl SurfaceFactory for StdoutFactory {
    fn create(&self, profile: &SurfaceProfile) -> Result<Arc<dyn DisplaySurface>, SurfaceError> {
        if self.created.swap(true, Ordering::SeqCst) {
            return Err(SurfaceError::Construct("surface already created".into()));
        }
        debug!(theme = %profile.theme, scrollback = profile.scrollback, "creating surface");
        Ok(self.surface.clone())
    }
}

/// The whole terminal window is the container.
struct TerminalContainer {
    size_tx: watch::Sender<ContainerSize>,
}

impl TerminalContainer {
    fn new() -> Self {
        let size = crossterm::terminal::size().unwrap_or((80, 24));
        let (size_tx, _) = watch::channel(size);
        Self { size_tx }
    }
}

impl Container for TerminalContainer {
    fn set_scrollable_full_height(&self) {
        // the terminal emulator already scrolls for us
    }

    fn size_events(&self) -> watch::Receiver<ContainerSize> {
        self.size_tx.subscribe()
    }
}

/// Local filesystem adapter.
struct LocalFilesystem;

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn list_directory(&self, path: &str) -> Result<Vec<String>, VfsError> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();
        Ok(entries)
    }
}

/// Builtin command interpreter for the demo session.
///
/// Deliberately tiny: it exists to exercise the prompt cycle and the
/// working-directory contract, not to be a shell.
struct BuiltinInterpreter {
    cwd: CwdHandle,
    surface: Arc<dyn DisplaySurface>,
    vfs: Arc<dyn Filesystem>,
    table: Arc<InMemoryProcessTable>,
    id: SessionId,
}

impl BuiltinInterpreter {
    fn say(&self, text: &str) {
        self.surface.write(text);
        self.surface.write("\r\n");
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else {
            let cwd = self.cwd.get();
            if cwd.ends_with('/') {
                format!("{cwd}{path}")
            } else {
                format!("{cwd}/{path}")
            }
        }
    }
}

#[async_trait]
impl CommandInterpreter for BuiltinInterpreter {
    async fn execute(&self, line: &str) -> Result<(), InterpreterError> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "" => {}
            "pwd" => self.say(&self.cwd.get()),
            "echo" => self.say(rest),
            "cd" => {
                let path = self.resolve(rest.trim().trim_matches('"'));
                match tokio::fs::metadata(&path).await {
                    Ok(meta) if meta.is_dir() => self.cwd.set(path),
                    _ => self.say(&format!("cd: no such directory: {rest}")),
                }
            }
            "ls" => match self.vfs.list_directory(&self.cwd.get()).await {
                Ok(entries) => self.say(&entries.join("  ")),
                Err(e) => self.say(&format!("ls: {e}")),
            },
            "clear" => self.surface.write("\x1b[2J\x1b[H"),
            "help" => {
                self.say("builtin commands: pwd cd ls echo clear help exit");
            }
            "exit" => {
                self.table.set_closing(self.id);
            }
            other => self.say(&format!("{other}: command not found")),
        }
        Ok(())
    }
}

fn init_logging() {
    let log_path = std::env::var_os("HOME")
        .map(std::path::PathBuf::from)
        .map(|h| h.join(".termsurf").join("termsurf.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("termsurf.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("termsurf starting...");

    let mut config = Config::load();
    if let Some(theme) = args.theme {
        config.surface.theme = theme;
    }
    let config = Arc::new(config);

    // One session owned by an in-memory process table.
    let id = SessionId(1);
    let table = Arc::new(InMemoryProcessTable::new());
    table.register(
        id,
        termsurf::SessionRecord {
            loading: true,
            libraries: BTreeSet::from([
                "xterm".to_string(),
                "local-echo".to_string(),
                "fit".to_string(),
            ]),
            launch_target: args.target,
            ..Default::default()
        },
    );

    let surface = StdoutSurface::new();
    let cwd = CwdHandle::new(config.home.clone());
    let vfs: Arc<dyn Filesystem> = Arc::new(LocalFilesystem);
    let interpreter = Arc::new(BuiltinInterpreter {
        cwd: cwd.clone(),
        surface: surface.clone(),
        vfs: vfs.clone(),
        table: table.clone(),
        id,
    });

    let mut session = Session::new(
        id,
        config,
        cwd,
        Collaborators {
            procs: table.clone(),
            vfs,
            interpreter,
            surfaces: Arc::new(StdoutFactory {
                surface: surface.clone(),
                created: AtomicBool::new(false),
            }),
            container: Arc::new(TerminalContainer::new()),
            clipboard: Arc::new(SystemClipboard::new()),
            bundles: Arc::new(StaticBundleLoader),
        },
    );

    // Everything is statically linked here, so all capabilities arrive at
    // once; a windowed host would grant them as modules finish loading.
    session.grant(Capabilities::all());
    session.evaluate().await;

    // Feed stdin lines to the editor until the session closes.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        session.evaluate().await;
        if session.state() == GateState::Disposed {
            break;
        }
        let Some(editor) = session.editor() else {
            break;
        };
        if !editor.has_pending_read() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            continue;
        }
        match lines.next_line().await {
            Ok(Some(line)) => {
                editor.deliver_line(&line);
            }
            // EOF and a broken stdin both close the session, so the loop
            // and resize tasks are joined below rather than leaked.
            Ok(None) => {
                table.set_closing(id);
                session.evaluate().await;
                break;
            }
            Err(e) => {
                warn!("stdin read failed: {e}");
                table.set_closing(id);
                session.evaluate().await;
                break;
            }
        }
    }

    session.join().await;
    info!("termsurf session ended");
    Ok(())
}
