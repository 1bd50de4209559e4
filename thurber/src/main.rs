//! Interactive reasoning loop CLI.
//!
//! Keeps durable state under `.thurber/` in the project root: a config file,
//! the current problem and the long-term goals.

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use thurber::exit_codes;
use thurber::io::completion::OllamaClient;
use thurber::io::config::{load_config, load_dotenv};
use thurber::io::init::{ThurberPaths, init_layout};
use thurber::io::input::{input_slot, spawn_line_reader};
use thurber::io::store::StateStore;
use thurber::logging;
use thurber::scheduler::Scheduler;
use thurber::session::Session;
use thurber::status::render_status;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "thurber",
    version,
    about = "Interactive reasoning loop over a local chat model"
)]
struct Cli {
    /// Project root containing `.thurber/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.thurber/` and a default `config.toml`.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Start the interactive loop on stdin/stdout.
    Run {
        /// Model to use instead of the configured one.
        #[arg(long)]
        model: Option<String>,
        /// Idle seconds before background work runs.
        #[arg(long)]
        idle_timeout_secs: Option<u64>,
    },
    /// Print the saved problem and goals.
    Status,
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(exit_codes::INVALID);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.root, force),
        Command::Run {
            model,
            idle_timeout_secs,
        } => cmd_run(&cli.root, model, idle_timeout_secs).await,
        Command::Status => cmd_status(&cli.root),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let paths = init_layout(root, force)?;
    println!("Initialized {}", paths.thurber_dir.display());
    Ok(())
}

async fn cmd_run(root: &Path, model: Option<String>, idle_timeout_secs: Option<u64>) -> Result<()> {
    load_dotenv(root);
    let paths = ThurberPaths::new(root);
    let mut cfg = load_config(&paths.config_path)?;
    if let Some(model) = model {
        cfg.model = model;
    }
    if let Some(secs) = idle_timeout_secs {
        cfg.idle_timeout_secs = secs;
    }
    cfg.validate()?;

    let client = OllamaClient::from_config(&cfg);
    let mut session = Session::load(StateStore::new(paths));
    info!(model = %cfg.model, endpoint = %cfg.endpoint, "starting session");

    println!(
        "thurber ({}). Enter a problem, `goal: <text>` to add a goal, or `exit` to quit.",
        client.model()
    );

    let (tx, mut slot) = input_slot();
    // The reader thread stays blocked on stdin after exit; the process ends anyway.
    spawn_line_reader(BufReader::new(io::stdin()), tx);

    let mut scheduler = Scheduler::new(&mut session, &client, io::stdout(), cfg.idle_timeout());
    scheduler.run(&mut slot).await;
    Ok(())
}

fn cmd_status(root: &Path) -> Result<()> {
    let store = StateStore::new(ThurberPaths::new(root));
    print!("{}", render_status(&store.load_problem(), &store.load_goals()));
    Ok(())
}
