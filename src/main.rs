use checkout_session::application::controller::Dispatch;
use checkout_session::application::runtime::SessionRuntime;
use checkout_session::domain::config::SessionConfig;
use checkout_session::domain::ports::RandomSourceBox;
use checkout_session::domain::session::{Session, ViewState};
use checkout_session::error::Result as SessionResult;
use checkout_session::infrastructure::random::StdRandom;
use checkout_session::interfaces::terminal::command_reader::{CommandReader, ShellCommand};
use checkout_session::interfaces::terminal::renderer::{OutputMode, Renderer};
use chrono::Utc;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about = "Simulated checkout session in the terminal", long_about = None)]
struct Cli {
    /// Multiply every timer duration by this factor (e.g. 0.01 for a quick demo)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Seed the random source for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Print every session snapshot as a JSON line instead of screens
    #[arg(long)]
    json: bool,

    /// Diagnostics written to stderr (e.g. warn, info, debug)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::default()
        .scaled(cli.time_scale)
        .into_diagnostic()?;
    let random: RandomSourceBox = match cli.seed {
        Some(seed) => Box::new(StdRandom::seeded(seed)),
        None => Box::new(StdRandom::from_entropy()),
    };
    let handle = SessionRuntime::spawn(config, random).into_diagnostic()?;

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let mut renderer = Renderer::new(mode);
    let mut snapshots = handle.subscribe();
    let mut commands = spawn_command_reader();
    let mut stdin_open = true;

    let mut current = snapshots.borrow_and_update().clone();
    emit(&mut renderer, &current).into_diagnostic()?;

    loop {
        // Info only changes on retry, which can no longer arrive once stdin
        // is closed.
        if current.state.is_terminal()
            || (current.state == ViewState::Info && !stdin_open)
        {
            break;
        }

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                current = snapshots.borrow_and_update().clone();
                emit(&mut renderer, &current).into_diagnostic()?;
            }
            line = commands.recv(), if stdin_open => match line {
                Some(Ok(ShellCommand::Quit)) => break,
                Some(Ok(ShellCommand::Session(command))) => {
                    if handle.execute(command).await.into_diagnostic()? == Dispatch::Ignored {
                        let state = snapshots.borrow().state;
                        eprintln!("`{command}` is not available while the session is in {state}");
                    }
                }
                Some(Err(e)) => eprintln!("{e}"),
                None => stdin_open = false,
            },
        }
    }

    // Already stopped is fine here.
    let _ = handle.shutdown().await;
    Ok(())
}

fn emit(renderer: &mut Renderer, session: &Session) -> SessionResult<()> {
    if let Some(output) = renderer.render(session, Utc::now())? {
        println!("{output}");
    }
    Ok(())
}

/// Reads stdin on a plain thread so a blocked read never holds up shutdown.
fn spawn_command_reader() -> mpsc::Receiver<SessionResult<ShellCommand>> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        let reader = CommandReader::new(io::stdin().lock());
        for command in reader.commands() {
            if tx.blocking_send(command).is_err() {
                break;
            }
        }
    });
    rx
}
