use clap::{Parser, Subcommand};
use deen::{Dispatcher, ResponseView};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deen")]
#[command(about = "DeenGPT CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: DEEN_CONFIG_PATH or ~/.deen/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Send one message and print the reply.
    Send {
        /// Config file path (default: DEEN_CONFIG_PATH or ~/.deen/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Chat endpoint URL (overrides DEEN_ENDPOINT and the config file)
        #[arg(long, short, value_name = "URL")]
        endpoint: Option<String>,

        /// Message text. May be empty.
        message: String,
    },

    /// Chat interactively: every line is sent as one message. /exit or /quit to leave.
    Chat {
        /// Config file path (default: DEEN_CONFIG_PATH or ~/.deen/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Chat endpoint URL (overrides DEEN_ENDPOINT and the config file)
        #[arg(long, short, value_name = "URL")]
        endpoint: Option<String>,
    },

    /// List the hadith collections the service has loaded.
    Books {
        /// Config file path (default: DEEN_CONFIG_PATH or ~/.deen/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Chat endpoint URL (overrides DEEN_ENDPOINT and the config file)
        #[arg(long, short, value_name = "URL")]
        endpoint: Option<String>,
    },
}

/// Renders each reply as one line on stdout.
struct StdoutView;

impl ResponseView for StdoutView {
    fn render(&self, text: &str) {
        println!("{}", text);
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("deen {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            config,
            endpoint,
            message,
        }) => {
            match run_send(config, endpoint, message).await {
                Ok(true) => {}
                // The view already printed the error line.
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    log::error!("send failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Chat { config, endpoint }) => {
            if let Err(e) = run_chat(config, endpoint).await {
                log::error!("chat failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Books { config, endpoint }) => {
            if let Err(e) = run_books(config, endpoint).await {
                log::error!("books failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(deen::config::default_config_path);
    deen::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", path.display());
    Ok(())
}

fn build_dispatcher(
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
) -> anyhow::Result<Dispatcher> {
    let (config, _) = deen::config::load_config(config_path)?;
    let dispatcher = Dispatcher::from_config(&config, endpoint.as_deref())?;
    log::debug!("using endpoint {}", dispatcher.client().endpoint());
    Ok(dispatcher)
}

/// One dispatch. `Ok(false)` means the request failed and the view has shown why;
/// `Err` is reserved for setup failures (config, endpoint) nothing has printed yet.
async fn run_send(
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
    message: String,
) -> anyhow::Result<bool> {
    let dispatcher = build_dispatcher(config_path, endpoint)?;
    Ok(dispatcher.dispatch(&message, &StdoutView).await.is_ok())
}

/// Message to send for one raw stdin line, or `None` when the line ends the session.
/// Only the line terminator is stripped; empty lines are sent as-is.
fn chat_line(raw: &str) -> Option<&str> {
    let input = raw.trim_end_matches(['\r', '\n']);
    let command = input.trim();
    if command.eq_ignore_ascii_case("/exit") || command.eq_ignore_ascii_case("/quit") {
        None
    } else {
        Some(input)
    }
}

async fn run_chat(config_path: Option<PathBuf>, endpoint: Option<String>) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let dispatcher = build_dispatcher(config_path, endpoint)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let Some(input) = chat_line(&line) else {
            break;
        };
        // Failures are rendered by the view; keep the session going.
        let _ = dispatcher.dispatch(input, &StdoutView).await;
    }

    Ok(())
}

async fn run_books(config_path: Option<PathBuf>, endpoint: Option<String>) -> anyhow::Result<()> {
    let dispatcher = build_dispatcher(config_path, endpoint)?;
    let books = dispatcher.client().list_books().await?;
    if books.is_empty() {
        println!("no collections loaded");
    }
    for book in books {
        println!("{}", book);
    }
    Ok(())
}
