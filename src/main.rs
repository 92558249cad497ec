//! shellwrap - line-oriented renderer for the observable shell
//!
//! Reads commands from stdin, feeds them to a `WrapperShell` and prints
//! whatever the shell reports: Normal lines to stdout, Error lines to
//! stderr, Image lines as `[image] <path>`. On a terminal the pending
//! fragment is shown as the prompt.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Weak};

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

use shellwrap::config::loader::ConfigLoader;
use shellwrap::{
    ChannelListener, Config, LineKind, Wrapper, WrapperEvent, WrapperListener, WrapperShell,
};

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Starting directory, overriding the configuration
    directory: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    fn parse() -> anyhow::Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let Some(path) = args.get(i + 1) else {
                        bail!("Missing config file path");
                    };
                    app_args.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--directory" | "-C" => {
                    let Some(path) = args.get(i + 1) else {
                        bail!("Missing directory");
                    };
                    app_args.directory = Some(PathBuf::from(path));
                    i += 1;
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("{} v{}", shellwrap::NAME, shellwrap::VERSION);
                    process::exit(0);
                }
                arg => bail!("Unknown option: {}", arg),
            }
            i += 1;
        }

        Ok(app_args)
    }
}

fn print_help() {
    println!("shellwrap - an observable command shell");
    println!();
    println!("USAGE:");
    println!("    shellwrap [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>      Path to configuration file");
    println!("    -C, --directory <DIR>    Starting working directory");
    println!("    -d, --debug              Enable debug logging");
    println!("    -h, --help               Print this help message");
    println!("    -V, --version            Print version information");
    println!();
    println!("BUILT-INS:");
    println!("    cd <path>      Change the working directory");
    println!("    view <path>    Show an image path");
    println!("    exit           Leave the shell");
    println!();
    println!("ENVIRONMENT:");
    println!("    SHELLWRAP_CONFIG    Path to configuration file");
    println!("    SHELLWRAP_DEBUG     Enable debug logging (1 or true)");
    println!("    RUST_LOG            Logging filter (error, warn, info, debug, trace)");
}

fn load_configuration(args: &AppArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => ConfigLoader::new()
            .load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load().context("loading configuration")?,
    };

    if let Some(dir) = &args.directory {
        config.shell.working_directory = Some(dir.clone());
    }
    Ok(config)
}

fn init_logging(args: &AppArgs, config: &Config) {
    let debug_env = env::var("SHELLWRAP_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let level = if args.debug || debug_env {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let env_filter = env::var("RUST_LOG").unwrap_or(level);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Prints drained lines and keeps the prompt on the last terminal row
struct Renderer {
    interactive: bool,
    shown_fragment: String,
}

impl Renderer {
    fn new() -> Self {
        Self {
            interactive: io::stdout().is_terminal() && io::stdin().is_terminal(),
            shown_fragment: String::new(),
        }
    }

    fn render(&mut self, shell: &WrapperShell) -> io::Result<()> {
        let lines = shell.drain_text();
        let fragment = shell.current_fragment();
        if lines.is_empty() && (!self.interactive || fragment == self.shown_fragment) {
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        if self.interactive && !self.shown_fragment.is_empty() {
            write!(stdout, "\r\x1b[2K")?;
        }

        for line in lines {
            match line.kind() {
                LineKind::Normal => writeln!(stdout, "{}", line.text())?,
                LineKind::Error => {
                    stdout.flush()?;
                    eprintln!("{}", line.text());
                }
                LineKind::Image => writeln!(stdout, "[image] {}", line.text())?,
            }
        }

        if self.interactive {
            write!(stdout, "{}", fragment)?;
            self.shown_fragment = fragment;
        }
        stdout.flush()
    }

    /// Erase the line the terminal echoed; the shell echoes it itself
    fn erase_typed_line(&mut self) -> io::Result<()> {
        if self.interactive {
            let mut stdout = io::stdout().lock();
            write!(stdout, "\x1b[1A\r\x1b[2K")?;
            stdout.flush()?;
            self.shown_fragment.clear();
        }
        Ok(())
    }
}

async fn run(shell: Arc<WrapperShell>) -> anyhow::Result<()> {
    let (listener, mut events) = ChannelListener::new();
    let weak: Weak<dyn WrapperListener> = Arc::downgrade(&listener) as Weak<dyn WrapperListener>;
    shell.add_listener(weak);

    let mut renderer = Renderer::new();
    renderer.render(&shell)?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = input.next_line(), if stdin_open => {
                match line.context("reading stdin")? {
                    Some(line) => {
                        renderer.erase_typed_line()?;
                        shell.send_line(&line, LineKind::Normal);
                    }
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                        if !shell.is_delegating() {
                            renderer.render(&shell)?;
                            break;
                        }
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                renderer.render(&shell)?;
                match event {
                    WrapperEvent::Finished(id) if id == shell.id() => {
                        info!("Shell exited");
                        break;
                    }
                    _ if !stdin_open && !shell.is_delegating() => break,
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    if renderer.interactive {
        println!();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match AppArgs::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Failed to parse arguments: {}", e);
            print_help();
            process::exit(1);
        }
    };

    let config = load_configuration(&args)?;
    init_logging(&args, &config);
    info!("Starting {} v{}", shellwrap::NAME, shellwrap::VERSION);

    let shell = WrapperShell::new(config).context("starting shell")?;
    let result = run(Arc::clone(&shell)).await;
    shell.shutdown();

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
