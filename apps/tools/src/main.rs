use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use game_core::{CircleBoard, GameSettings, NumberGame, Session};
use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{GuessRange, SessionId},
    protocol::ServerEvent,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{parse_input, Input, HELP};

#[derive(Parser, Debug)]
#[command(about = "Terminal host for the circle spawner and the number game")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the number game on stdin/stdout.
    Play {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        min: i64,
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        max: i64,
        /// 0 = unlimited
        #[arg(long, default_value_t = 0)]
        max_attempts: u32,
        #[arg(long)]
        no_hints: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Spawn circles and print their render instructions as JSON.
    Circles {
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            min,
            max,
            max_attempts,
            no_hints,
            seed,
        } => {
            let settings = GameSettings::new(GuessRange { min, max }, max_attempts, !no_hints)?;
            let mut session = Session::with_rng(SessionId::new(), settings, rng_for(seed));
            let stdin = io::stdin();
            play(&mut session, stdin.lock(), io::stdout().lock())?;
        }
        Command::Circles { count, seed } => {
            let mut rng = rng_for(seed);
            let mut board = CircleBoard::default();
            for _ in 0..count {
                board.spawn(&mut rng);
            }
            println!("{}", serde_json::to_string_pretty(&board.overlays())?);
        }
    }

    Ok(())
}

fn rng_for(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy)
}

fn play<R: BufRead, W: Write>(session: &mut Session, input: R, mut out: W) -> Result<()> {
    let range = session.game().range();
    writeln!(out, "Guess the number I'm thinking of ({range}). Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = match parse_input(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(out, "error: {err:#}")?;
                continue;
            }
        };
        match parsed {
            Input::Request(request) => match session.apply(request) {
                Ok(event) => writeln!(out, "{}", describe(&event))?,
                Err(err) => writeln!(out, "warning: {err}")?,
            },
            Input::Status => write_status(&mut out, session.game())?,
            Input::Board => write_board(&mut out, session.game())?,
            Input::Circles => {
                for overlay in session.circles().overlays() {
                    writeln!(
                        out,
                        "circle at {}%,{}% size {}px colour {}",
                        overlay.left_pct, overlay.top_pct, overlay.diameter_px, overlay.color_hex
                    )?;
                }
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => break,
        }
    }
    debug!(session_id = %session.id(), "terminal session finished");
    Ok(())
}

fn describe(event: &ServerEvent) -> String {
    match event {
        ServerEvent::CircleSpawned { overlay, total } => format!(
            "circle #{total} at {}%,{}% size {}px colour {}",
            overlay.left_pct, overlay.top_pct, overlay.diameter_px, overlay.color_hex
        ),
        ServerEvent::RangeConfigured { range, new_round } => {
            if *new_round {
                format!("Range set to {range}. New number drawn.")
            } else {
                format!("Range unchanged ({range}).")
            }
        }
        ServerEvent::SettingsUpdated {
            max_attempts,
            hints_enabled,
        } => {
            let limit = match max_attempts {
                0 => "unlimited".to_string(),
                n => n.to_string(),
            };
            let hints = if *hints_enabled { "on" } else { "off" };
            format!("Attempt limit: {limit}. Hints: {hints}.")
        }
        ServerEvent::GuessEvaluated {
            feedback,
            celebrate,
            ..
        } => {
            if *celebrate {
                format!("*** {feedback} ***")
            } else {
                feedback.to_string()
            }
        }
        ServerEvent::HintGiven {
            text,
            attempt_count,
            ..
        } => format!("Hint: {text} (attempts: {attempt_count})"),
        ServerEvent::GameStarted { .. } => "New game started!".to_string(),
        ServerEvent::NumberRevealed { secret } => format!("The number was {secret}."),
        ServerEvent::LeaderboardReset => "Leaderboard reset.".to_string(),
    }
}

fn write_status<W: Write>(out: &mut W, game: &NumberGame) -> io::Result<()> {
    let view = game.view();
    if let Some(message) = view.message {
        writeln!(out, "{message}")?;
    }
    if view.attempt_history.is_empty() {
        writeln!(out, "No attempts yet.")?;
    } else {
        let history: Vec<String> = view.attempt_history.iter().map(i64::to_string).collect();
        writeln!(out, "Your attempts: {}", history.join(" "))?;
    }
    writeln!(out, "Attempts: {}", view.attempt_count)?;
    writeln!(out, "Closeness: {}%", view.closeness_pct)?;
    match view.best_score {
        Some(best) => writeln!(out, "Best score: {best}"),
        None => writeln!(out, "Best score: -"),
    }
}

fn write_board<W: Write>(out: &mut W, game: &NumberGame) -> io::Result<()> {
    let rows = game.view().leaderboard;
    if rows.is_empty() {
        return writeln!(out, "No scores yet. Be the first!");
    }
    for row in rows {
        writeln!(out, "{}. {} attempts ({})", row.rank, row.score, row.timestamp)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
