use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info};

use fare_ui::{
    UiEvent, app,
    commands::{self, Command, HELP},
    config_loader, logging, run_session,
    session::Session,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Airline ticket change calculator.
///
/// Works out how much more a passenger owes when a ticket is reissued:
/// the base fare difference, penalties for non-flexible fares, and the
/// per-tax-code differences.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML file overriding row limits and timings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `fare_ui=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not print log output on the console.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Calculate a saved scenario and copy its summary.
    Summary {
        /// Scenario TOML with fares, flexibility, penalties and tax rows.
        #[arg(long)]
        scenario: PathBuf,

        /// CSV of tax rows replacing the scenario's rows.
        #[arg(long)]
        rows: Option<PathBuf>,

        /// Write the summary to this file instead of standard output.
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },

    /// Edit a fare interactively, one command per line.
    Interactive {
        /// Write copied summaries to this file instead of standard output.
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    logging::init_default_logging();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── interactive mode ────────────────────────────────────────────────────────

/// Reads commands from stdin and forwards them to the session until `quit`
/// or end of input. Dropping the sender ends the session loop.
async fn read_commands(events: mpsc::Sender<UiEvent>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match commands::parse_command(&line) {
            Ok(Command::Event(event)) => {
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Command::Help) => print!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }
    debug!("Command reader finished");
    Ok(())
}

async fn run_interactive(
    session: Session,
    clipboard: Option<PathBuf>,
) -> anyhow::Result<()> {
    let clipboard = app::clipboard_for(clipboard.as_deref());
    let (tx, rx) = mpsc::channel(32);

    println!("{}", session.view());
    println!("Type 'help' for commands.");

    let reader = tokio::spawn(async move {
        logging::log_task_error("stdin", read_commands(tx).await);
    });

    let session = run_session(session, rx, clipboard, |session, event| {
        if matches!(event, Some(UiEvent::Show)) {
            println!("{}", session.state().form);
        }
        println!("{}", session.view());
    })
    .await;

    reader.await?;
    info!(
        recalculations = session.recalculation_count(),
        "Interactive session ended"
    );
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = config_loader::load_config(cli.config.as_deref())?;

    match cli.command {
        Mode::Summary {
            scenario,
            rows,
            clipboard,
        } => {
            let clipboard = app::clipboard_for(clipboard.as_deref());
            let session =
                app::run_summary(&config, &scenario, rows.as_deref(), clipboard.as_ref()).await?;
            debug!(total = %session.view().total_fare_diff, "Summary copied");
        }
        Mode::Interactive { clipboard } => {
            run_interactive(Session::new(&config), clipboard).await?;
        }
    }

    Ok(())
}
