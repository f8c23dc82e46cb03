use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use lawn_rake::{Action, Direction, Game, GameConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Drive the robot over the lawn from stdin: w/a/s/d move, W/A/S/D rake,
/// c collects, p prints the position, q quits.
#[derive(Parser, Debug)]
#[command(name = "lawn-rake")]
#[command(version, about = "Leaf raking robot on a lawn", long_about = None)]
struct Args {
    /// JSON game config (built-in defaults when omitted)
    config: Option<PathBuf>,

    /// Write the step trace to this CSV file when the session ends
    trace: Option<PathBuf>,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lawn_rake=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

enum Command {
    Act(Action),
    WhereIs,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim() {
        "w" => Command::Act(Action::Move(Direction::Up)),
        "s" => Command::Act(Action::Move(Direction::Down)),
        "a" => Command::Act(Action::Move(Direction::Left)),
        "d" => Command::Act(Action::Move(Direction::Right)),
        "W" => Command::Act(Action::Rake(Direction::Up)),
        "S" => Command::Act(Action::Rake(Direction::Down)),
        "A" => Command::Act(Action::Rake(Direction::Left)),
        "D" => Command::Act(Action::Rake(Direction::Right)),
        "c" => Command::Act(Action::Collect),
        "p" => Command::WhereIs,
        "q" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    let config = match &args.config {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };

    let mut game = Game::new(&config)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Some(Command::Act(action)) => match game.step(action) {
                Ok(step) => info!(
                    "{} => reward {} energy {} at {}",
                    action, step.reward, step.energy, step.pos
                ),
                Err(e) if e.is_exhaustion() => {
                    warn!("{}", e);
                    break;
                }
                Err(e) => {
                    error!("{}", e);
                    return Err(e.into());
                }
            },
            Some(Command::WhereIs) => {
                game.robot().whereis();
            }
            Some(Command::Quit) => break,
            None => {}
        }
    }

    info!(
        turns = game.turn(),
        total_reward = game.total_reward(),
        leaves = game.lawn().total_leaves(),
        "episode finished"
    );

    if let Some(path) = &args.trace {
        lawn_rake::write_trace_to_path(game.trace(), path)?;
        info!("trace written to {}", path.display());
    }
    Ok(())
}
