//! Line-oriented host console driving a [`BoardSession`].
//!
//! Teams are addressed by their 1-based display number, cells by their 0-based row and column.

use crate::{
    error::CommandError,
    services::session_service::BoardSession,
    state::roster::{MIN_TEAMS, Team},
};

/// Command reference printed by `help`.
pub const HELP: &str = "\
commands:
  start N          start the game with N teams (2-6)
  reset [N]        wipe used cells and scores, back to the setup prompt
  use R C          mark cell at row R, column C as used
  open R C P       open the clue at row R, column C worth P points
  correct | wrong  resolve the open clue for the selected team
  close            close the open clue without a verdict
  score T D        add D (may be negative) to team T
  plus T | minus T add or subtract the current score step for team T
  rename T NAME    rename team T
  select T         quick-select team T
  deselect         clear the quick-selection
  step N           set the score step
  show             print the session as JSON
  clear            remove every stored slot of this board
  quit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the game with a team count (clamped).
    Start(i64),
    /// Reset, optionally with a new team count.
    Reset(Option<i64>),
    /// Mark a cell used.
    Use {
        /// Row of the cell.
        row: u32,
        /// Column of the cell.
        col: u32,
    },
    /// Open a clue.
    Open {
        /// Row of the cell.
        row: u32,
        /// Column of the cell.
        col: u32,
        /// Points the clue is worth.
        points: i64,
    },
    /// Resolve the open clue; `true` for a correct answer.
    Verdict(bool),
    /// Close the open clue without a verdict.
    Close,
    /// Add a delta to a team's score.
    Score {
        /// Roster index of the team.
        team: usize,
        /// Points to add, may be negative.
        delta: i64,
    },
    /// Award the score step to a team.
    Plus(usize),
    /// Take the score step from a team.
    Minus(usize),
    /// Rename a team.
    Rename {
        /// Roster index of the team.
        team: usize,
        /// New name; blank keeps the default.
        name: String,
    },
    /// Quick-select a team.
    Select(usize),
    /// Clear the quick-selection.
    Deselect,
    /// Set the score step.
    Step(i64),
    /// Print the snapshot.
    Show,
    /// Remove every stored slot of the board.
    Clear,
    /// Print the command list.
    Help,
    /// Stop the console.
    Quit,
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text and keep reading commands.
    Text(String),
    /// Stop the console.
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some((word, rest)) = split_word(line) else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" => Command::Start(
            split_word(rest).map_or(MIN_TEAMS as i64, |(word, _)| team_count(word)),
        ),
        "reset" => Command::Reset(split_word(rest).map(|(word, _)| team_count(word))),
        "use" => {
            let (row, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
                command: "use",
                argument: "a row and a column",
            })?;
            Command::Use {
                row: parse_number(row, "row")?,
                col: parse_number(required_word(rest, "use", "a column")?, "column")?,
            }
        }
        "open" => {
            let (row, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
                command: "open",
                argument: "a row, a column and points",
            })?;
            let (col, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
                command: "open",
                argument: "a column and points",
            })?;
            Command::Open {
                row: parse_number(row, "row")?,
                col: parse_number(col, "column")?,
                points: parse_number(required_word(rest, "open", "points")?, "points")?,
            }
        }
        "correct" => Command::Verdict(true),
        "wrong" => Command::Verdict(false),
        "close" => Command::Close,
        "score" => {
            let (team, rest) = split_word(rest).ok_or(CommandError::MissingArgument {
                command: "score",
                argument: "a team number and a delta",
            })?;
            Command::Score {
                team: parse_team(team)?,
                delta: parse_number(required_word(rest, "score", "a delta")?, "delta")?,
            }
        }
        "plus" => Command::Plus(parse_team(required_word(rest, "plus", "a team number")?)?),
        "minus" => Command::Minus(parse_team(required_word(rest, "minus", "a team number")?)?),
        "rename" => {
            let (team, name) = split_word(rest).ok_or(CommandError::MissingArgument {
                command: "rename",
                argument: "a team number and a name",
            })?;
            Command::Rename {
                team: parse_team(team)?,
                name: name.to_string(),
            }
        }
        "select" => Command::Select(parse_team(required_word(rest, "select", "a team number")?)?),
        "deselect" => Command::Deselect,
        "step" => Command::Step(required_int(rest, "step", "a score step")?),
        "show" => Command::Show,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Apply a command to the session and describe the outcome.
pub fn execute(session: &mut BoardSession, command: Command) -> Reply {
    let text = match command {
        Command::Start(count) => {
            let state = session.start(count);
            format!("started with {} teams", state.team_count)
        }
        Command::Reset(count) => {
            let state = session.reset(count);
            format!("reset; setup prompt shown for {} teams", state.team_count)
        }
        Command::Use { row, col } => {
            if session.mark_used(row, col) {
                format!("cell {row}:{col} used")
            } else {
                format!("cell {row}:{col} was already used")
            }
        }
        Command::Open { row, col, points } => {
            let clue = session.open_cell(row, col, points);
            format!("clue {} open for {} points", clue.cell, clue.points)
        }
        Command::Verdict(correct) => {
            if session.active_clue().is_none() {
                "no clue is open".to_string()
            } else {
                let selected = session.active_team();
                match (session.award_active(correct), selected) {
                    (Some(team), Some(index)) => describe_team(index, Some(team)),
                    _ => "clue closed; no team selected".to_string(),
                }
            }
        }
        Command::Close => {
            session.close_cell();
            "clue closed".to_string()
        }
        Command::Score { team, delta } => describe_team(team, session.adjust_score(team, delta)),
        Command::Plus(team) => describe_team(team, session.add_step(team)),
        Command::Minus(team) => describe_team(team, session.subtract_step(team)),
        Command::Rename { team, name } => describe_team(team, session.rename_team(team, &name)),
        Command::Select(team) => {
            if session.select_team(team) {
                format!("team {} selected", team + 1)
            } else {
                format!("no team {}", team + 1)
            }
        }
        Command::Deselect => {
            session.clear_selection();
            "selection cleared".to_string()
        }
        Command::Step(step) => {
            if session.set_score_step(step) {
                format!("score step is {step}")
            } else {
                format!("score step must be positive (still {})", session.score_step())
            }
        }
        Command::Show => match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => json,
            Err(err) => format!("failed to render session: {err}"),
        },
        Command::Clear => {
            session.clear();
            "board state cleared".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => return Reply::Quit,
    };

    Reply::Text(text)
}

fn describe_team(index: usize, team: Option<Team>) -> String {
    match team {
        Some(team) => format!("{}: {} ({})", index + 1, team.name, team.score),
        None => format!("no team {}", index + 1),
    }
}

fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    })
}

fn required_word<'a>(
    input: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    split_word(input)
        .map(|(word, _)| word)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn required_int(
    input: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<i64, CommandError> {
    parse_number(required_word(input, command, argument)?, argument)
}

/// Team counts never fail to parse: anything that is not a number asks for the minimum.
fn team_count(value: &str) -> i64 {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|count| count.is_finite())
                .map(|count| count.trunc() as i64)
        })
        .filter(|count| *count != 0)
        .unwrap_or(MIN_TEAMS as i64)
}

fn parse_number<T: std::str::FromStr>(value: &str, argument: &'static str) -> Result<T, CommandError> {
    value.parse::<T>().map_err(|_| CommandError::InvalidNumber {
        argument,
        value: value.to_string(),
    })
}

/// Parse a 1-based team number into a roster index.
fn parse_team(value: &str) -> Result<usize, CommandError> {
    match parse_number::<usize>(value, "team number")? {
        0 => Err(CommandError::InvalidNumber {
            argument: "team number",
            value: value.to_string(),
        }),
        number => Ok(number - 1),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{dao::kv_store::MemoryStore, services::session_service::load_session};

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("  start 4 ").unwrap(), Some(Command::Start(4)));
        assert_eq!(parse_command("reset").unwrap(), Some(Command::Reset(None)));
        assert_eq!(parse_command("RESET 3").unwrap(), Some(Command::Reset(Some(3))));
        assert_eq!(
            parse_command("use 1 2").unwrap(),
            Some(Command::Use { row: 1, col: 2 })
        );
        assert_eq!(
            parse_command("score 1 -100").unwrap(),
            Some(Command::Score {
                team: 0,
                delta: -100
            })
        );
        assert_eq!(
            parse_command("rename 2 The Night Owls").unwrap(),
            Some(Command::Rename {
                team: 1,
                name: "The Night Owls".into()
            })
        );
        assert_eq!(
            parse_command("open 2 3 400").unwrap(),
            Some(Command::Open {
                row: 2,
                col: 3,
                points: 400
            })
        );
        assert_eq!(parse_command("wrong").unwrap(), Some(Command::Verdict(false)));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn unparsable_team_counts_ask_for_the_minimum() {
        assert_eq!(parse_command("start").unwrap(), Some(Command::Start(2)));
        assert_eq!(parse_command("start abc").unwrap(), Some(Command::Start(2)));
        assert_eq!(parse_command("start 0").unwrap(), Some(Command::Start(2)));
        assert_eq!(parse_command("start 4.8").unwrap(), Some(Command::Start(4)));
        assert_eq!(parse_command("reset many").unwrap(), Some(Command::Reset(Some(2))));
        assert_eq!(parse_command("reset -3").unwrap(), Some(Command::Reset(Some(-3))));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_command("dance").unwrap_err(),
            CommandError::Unknown("dance".into())
        );
        assert!(matches!(
            parse_command("open 1 2").unwrap_err(),
            CommandError::MissingArgument {
                command: "open",
                ..
            }
        ));
        assert!(matches!(
            parse_command("use 1").unwrap_err(),
            CommandError::MissingArgument { command: "use", .. }
        ));
        assert!(matches!(
            parse_command("select 0").unwrap_err(),
            CommandError::InvalidNumber { .. }
        ));
        assert!(matches!(
            parse_command("use -1 2").unwrap_err(),
            CommandError::InvalidNumber { argument: "row", .. }
        ));
    }

    #[test]
    fn executes_against_session() {
        let mut session = load_session(Arc::new(MemoryStore::new()), "console");

        let reply = execute(&mut session, Command::Start(9));
        assert_eq!(reply, Reply::Text("started with 6 teams".into()));

        let reply = execute(&mut session, Command::Score { team: 0, delta: 200 });
        assert_eq!(reply, Reply::Text("1: Team 1 (200)".into()));

        let reply = execute(&mut session, Command::Score { team: 8, delta: 200 });
        assert_eq!(reply, Reply::Text("no team 9".into()));

        let reply = execute(&mut session, Command::Use { row: 0, col: 0 });
        assert_eq!(reply, Reply::Text("cell 0:0 used".into()));

        let Reply::Text(json) = execute(&mut session, Command::Show) else {
            panic!("show should print the snapshot");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "started");
        assert_eq!(value["used_cells"][0], "0:0");

        assert_eq!(execute(&mut session, Command::Quit), Reply::Quit);
    }

    #[test]
    fn step_and_selection_commands_drive_scores() {
        let mut session = load_session(Arc::new(MemoryStore::new()), "console");
        execute(&mut session, Command::Start(3));

        assert_eq!(
            execute(&mut session, Command::Step(250)),
            Reply::Text("score step is 250".into())
        );
        assert_eq!(
            execute(&mut session, Command::Step(0)),
            Reply::Text("score step must be positive (still 250)".into())
        );
        assert_eq!(
            execute(&mut session, Command::Plus(1)),
            Reply::Text("2: Team 2 (250)".into())
        );
        assert_eq!(
            execute(&mut session, Command::Minus(2)),
            Reply::Text("3: Team 3 (-250)".into())
        );
        assert_eq!(
            execute(&mut session, Command::Plus(5)),
            Reply::Text("no team 6".into())
        );

        assert_eq!(
            execute(&mut session, Command::Select(2)),
            Reply::Text("team 3 selected".into())
        );
        assert_eq!(
            execute(&mut session, Command::Select(4)),
            Reply::Text("no team 5".into())
        );
        assert_eq!(session.active_team(), Some(2));
        execute(&mut session, Command::Deselect);
        assert_eq!(session.active_team(), None);
    }

    #[test]
    fn clue_commands_resolve_for_selected_team() {
        let mut session = load_session(Arc::new(MemoryStore::new()), "console");
        execute(&mut session, Command::Start(2));

        assert_eq!(
            execute(&mut session, Command::Verdict(true)),
            Reply::Text("no clue is open".into())
        );
        assert_eq!(
            execute(
                &mut session,
                Command::Open {
                    row: 1,
                    col: 0,
                    points: 400
                }
            ),
            Reply::Text("clue 1:0 open for 400 points".into())
        );
        assert_eq!(
            execute(&mut session, Command::Verdict(true)),
            Reply::Text("clue closed; no team selected".into())
        );

        execute(&mut session, Command::Select(0));
        execute(
            &mut session,
            Command::Open {
                row: 2,
                col: 0,
                points: 600,
            },
        );
        assert_eq!(
            execute(&mut session, Command::Verdict(true)),
            Reply::Text("1: Team 1 (600)".into())
        );
        assert!(session.is_used(1, 0));
        assert!(session.is_used(2, 0));
    }

    #[test]
    fn clear_command_wipes_stored_slots() {
        let memory = Arc::new(MemoryStore::new());
        let mut session = load_session(memory.clone(), "console");
        execute(&mut session, Command::Start(4));
        execute(&mut session, Command::Use { row: 0, col: 0 });
        assert!(!memory.is_empty());

        assert_eq!(
            execute(&mut session, Command::Clear),
            Reply::Text("board state cleared".into())
        );
        assert!(memory.is_empty());
        assert!(session.used_cells().is_empty());
        assert_eq!(session.roster().len(), 2);
    }
}
