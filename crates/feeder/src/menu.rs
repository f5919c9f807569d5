//! The command menu, either typed interactively or read from a script.
//!
//! Commands are a single key, optionally followed by the number they need
//! (`w 4`, `1 90`). When typing interactively we ask for a missing number.

use domino_geom::Param;
use domino_planner::{Direction, MoveKind, Planner, Side};
use reedline::{DefaultPrompt, DefaultPromptSegment, Prompt, Reedline};

use crate::output::Sink;

const MENU: &str = "\
w - Add Action, Straight Line
b - Add Action, Straight Line Backward
a - Add Action, Turn Left (# dominoes input)
d - Add Action, Turn Right (# dominoes input)

1 - Add Action, Turn Left (degrees input)
2 - Add Action, Turn Right (degrees input)

r - Remove Last Action
c - Clear Path and Start Over
g - Show Geometry
f - Finalize Path & Write Output

e - Exit Program";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Straight(Direction, Option<i64>),
    PivotByDominoes(Side, Option<i64>),
    PivotByDegrees(Side, Option<f64>),
    RemoveLast,
    Clear,
    ShowGeometry,
    Finalize,
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input `{0}`, no action taken")]
    Unknown(String),
    #[error("expected a number, got `{0}`")]
    BadNumber(String),
}

fn number<T: std::str::FromStr>(arg: Option<&str>) -> Result<Option<T>, CommandError> {
    arg.map(|s| s.parse().map_err(|_| CommandError::BadNumber(s.to_owned())))
        .transpose()
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let key = words.next().unwrap_or("");
        let arg = words.next();
        if words.next().is_some() {
            return Err(CommandError::Unknown(line.trim().to_owned()));
        }

        let cmd = match key.to_ascii_lowercase().as_str() {
            "w" => Command::Straight(Direction::Forward, number(arg)?),
            "b" => Command::Straight(Direction::Backward, number(arg)?),
            "a" => Command::PivotByDominoes(Side::Left, number(arg)?),
            "d" => Command::PivotByDominoes(Side::Right, number(arg)?),
            "1" => Command::PivotByDegrees(Side::Left, number(arg)?),
            "2" => Command::PivotByDegrees(Side::Right, number(arg)?),
            "r" if arg.is_none() => Command::RemoveLast,
            "c" if arg.is_none() => Command::Clear,
            "g" if arg.is_none() => Command::ShowGeometry,
            "f" if arg.is_none() => Command::Finalize,
            "e" if arg.is_none() => Command::Exit,
            _ => return Err(CommandError::Unknown(line.trim().to_owned())),
        };
        Ok(cmd)
    }

    /// The question to ask when this command is missing its number.
    fn question(&self) -> Option<&'static str> {
        match self {
            Command::Straight(_, None) | Command::PivotByDominoes(_, None) => {
                Some("Enter # of Dominoes to Set Down: ")
            }
            Command::PivotByDegrees(_, None) => Some("Enter Degrees to Turn: "),
            _ => None,
        }
    }

    /// Fills in a missing number.
    fn with_answer(self, answer: &str) -> Result<Command, CommandError> {
        let answer = Some(answer.trim());
        Ok(match self {
            Command::Straight(dir, None) => Command::Straight(dir, number(answer)?),
            Command::PivotByDominoes(side, None) => {
                Command::PivotByDominoes(side, number(answer)?)
            }
            Command::PivotByDegrees(side, None) => Command::PivotByDegrees(side, number(answer)?),
            cmd => cmd,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

fn show_geometry(planner: &Planner) {
    let geom = planner.geometry();
    for param in Param::ALL {
        eprintln!("{param} = {}", geom.params().get(param));
    }
    eprintln!("distance per step = {}", geom.distance_per_step().get());
    eprintln!("turn circumference = {}", geom.turn_circumference().get());
    eprintln!(
        "step degree change = {}",
        geom.step_degree_change().to_degrees()
    );
    eprintln!(
        "degrees between dominoes = {}",
        geom.degrees_between_dominoes().to_degrees()
    );
}

/// Runs a single, complete command against the planner.
pub fn apply(planner: &mut Planner, sink: &mut dyn Sink, cmd: Command) -> anyhow::Result<Flow> {
    match cmd {
        Command::Straight(dir, Some(n)) => {
            let kind = match dir {
                Direction::Forward => MoveKind::StraightForward,
                Direction::Backward => MoveKind::StraightBackward,
            };
            planner.append(kind, n, -1.0);
        }
        Command::PivotByDominoes(side, Some(n)) => {
            planner.append(pivot_kind(side), n, -1.0);
        }
        Command::PivotByDegrees(side, Some(deg)) => {
            planner.append(pivot_kind(side), -1, deg);
        }
        Command::Straight(..) | Command::PivotByDominoes(..) | Command::PivotByDegrees(..) => {
            eprintln!("warning: missing number, no action taken");
        }
        Command::RemoveLast => match planner.remove_last() {
            Ok(action) => eprintln!("removed {action}"),
            Err(e) => eprintln!("warning: {e}, nothing to remove"),
        },
        Command::Clear => planner.clear(),
        Command::ShowGeometry => show_geometry(planner),
        Command::Finalize => match planner.expand() {
            Ok(prog) => {
                sink.finalize(planner, &prog)?;
                eprintln!("{} instructions, {} dominoes", prog.len(), prog.drops());
            }
            Err(e) => eprintln!("error: {e}, nothing written"),
        },
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn pivot_kind(side: Side) -> MoveKind {
    match side {
        Side::Left => MoveKind::PivotLeft,
        Side::Right => MoveKind::PivotRight,
    }
}

/// Runs one command per line. Blank lines and `#` comments are skipped, and
/// bad lines are reported without stopping the script.
pub fn run_script(planner: &mut Planner, sink: &mut dyn Sink, script: &str) -> anyhow::Result<()> {
    for (idx, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cmd = match Command::parse(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("warning: line {}: {e}", idx + 1);
                continue;
            }
        };
        if apply(planner, sink, cmd)? == Flow::Exit {
            break;
        }
    }
    Ok(())
}

#[derive(Debug)]
enum Error {
    Exit,
    Err(anyhow::Error),
}

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Error::Err(e.into())
    }
}

fn string_prompt(s: &str) -> DefaultPrompt {
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(s.to_owned()),
        DefaultPromptSegment::Empty,
    )
}

fn read_cmd(reed: &mut Reedline, prompt: &dyn Prompt) -> Result<String, Error> {
    let s = reed.read_line(prompt)?;
    match s {
        reedline::Signal::Success(s) => Ok(s),
        reedline::Signal::CtrlC | reedline::Signal::CtrlD => Err(Error::Exit),
    }
}

fn interactive_loop(planner: &mut Planner, sink: &mut dyn Sink) -> Result<(), Error> {
    let mut reed = Reedline::create();
    let prompt = string_prompt("Input Desired Action");
    loop {
        eprintln!("{MENU}\n");
        eprintln!("You are on Path Action #{}\n", planner.count() + 1);

        let line = read_cmd(&mut reed, &prompt)?;
        let mut cmd = match Command::parse(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("WARNING: {e}\n");
                continue;
            }
        };
        if let Some(question) = cmd.question() {
            let answer = read_cmd(&mut reed, &string_prompt(question))?;
            cmd = match cmd.with_answer(&answer) {
                Ok(cmd) => cmd,
                Err(e) => {
                    eprintln!("WARNING: {e}, no action taken\n");
                    continue;
                }
            };
        }

        if apply(planner, sink, cmd)? == Flow::Exit {
            return Ok(());
        }
        eprintln!();
    }
}

pub fn interactive(planner: &mut Planner, sink: &mut dyn Sink) -> anyhow::Result<()> {
    match interactive_loop(planner, sink) {
        Ok(()) | Err(Error::Exit) => Ok(()),
        Err(Error::Err(e)) => Err(e),
    }
}
