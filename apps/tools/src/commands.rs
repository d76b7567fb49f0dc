use anyhow::{bail, Context, Result};
use shared::protocol::ClientRequest;

pub const HELP: &str = "\
commands:
  guess <n>        submit a guess
  hint             get a hint (costs one attempt)
  new              start a new game
  reveal           reveal the number (abandon)
  range <min> <max>
  limit <n>        attempt limit, 0 = unlimited
  hints on|off
  circle           spawn a circle
  circles          list spawned circles
  status           show the game panel
  board            show the leaderboard
  reset-board      clear the leaderboard
  help
  quit";

#[derive(Debug)]
pub enum Input {
    Request(ClientRequest),
    Status,
    Board,
    Circles,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        bail!("empty command");
    };
    let args: Vec<&str> = words.collect();

    let input = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("guess" | "g", [value]) => Input::Request(ClientRequest::Guess {
            value: parse_number(value)?,
        }),
        ("hint", []) => Input::Request(ClientRequest::RequestHint),
        ("new", []) => Input::Request(ClientRequest::NewGame),
        ("reveal", []) => Input::Request(ClientRequest::Reveal),
        ("range", [min, max]) => Input::Request(ClientRequest::ConfigureRange {
            min: parse_number(min)?,
            max: parse_number(max)?,
        }),
        ("limit", [value]) => Input::Request(ClientRequest::SetMaxAttempts {
            max_attempts: value
                .parse()
                .with_context(|| format!("'{value}' is not a valid attempt limit"))?,
        }),
        ("hints", [toggle]) => {
            let enabled = match *toggle {
                "on" => true,
                "off" => false,
                other => bail!("expected 'on' or 'off', got '{other}'"),
            };
            Input::Request(ClientRequest::SetHintsEnabled { enabled })
        }
        ("circle", []) => Input::Request(ClientRequest::SpawnCircle),
        ("circles", []) => Input::Circles,
        ("reset-board", []) => Input::Request(ClientRequest::ResetLeaderboard),
        ("status", []) => Input::Status,
        ("board", []) => Input::Board,
        ("help" | "?", []) => Input::Help,
        ("quit" | "exit" | "q", []) => Input::Quit,
        (other, _) => bail!("unrecognised command '{other}', try 'help'"),
    };
    Ok(input)
}

fn parse_number(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a whole number"))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
