//! Operator prompt: reads lines with rustyline and turns them into commands.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};

use super::error::{DashboardError, InputError};
use crate::domain::{
    Direction, GridLabels, MapName, Owner, ShipSpec, SonarCommand, TravelCommand,
};

const PROMPT: &str = "serenity> ";

pub const HELP: &str = "\
commands:
  move <north|south|east|west>   move your ship one cell
  torpedo <cell>                 launch a torpedo at a cell, e.g. B3
  mine <cell>                    drop a mine at a cell
  detonate <mine uid>            detonate one of your mines
  repair                         repair your ship
  takeoff <planet id>            leave for another planet
  start <alpha|bravo|charlie> <ship name> <hp>
                                 start a battle (game master)
  end                            end the battle (game master)
  show                           print every panel
  status                         print the connection status
  help                           print this help
  quit                           leave the dashboard";

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Sonar(SonarCommand),
    Travel(TravelCommand),
    Show,
    Status,
    Help,
    Quit,
    Blank,
}

/// Parse one prompt line for the operator playing `owner`.
///
/// `labels` are the labels of the current battle map, needed to aim weapons.
///
/// # Errors
///
/// Returns `InputError` describing why the line is not a valid command.
pub fn parse_input(line: &str, owner: Owner, labels: Option<&GridLabels>) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Blank);
    };
    let args: Vec<&str> = words.collect();

    let input = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("move", [direction]) => Input::Sonar(SonarCommand::Move {
            owner,
            direction: direction.parse::<Direction>()?,
        }),
        ("move", _) => return Err(InputError::Usage("move <north|south|east|west>")),

        ("torpedo", [cell]) => Input::Sonar(SonarCommand::LaunchTorpedo {
            owner,
            target: labels.ok_or(InputError::NoBattleMap)?.parse_cell(cell)?,
        }),
        ("torpedo", _) => return Err(InputError::Usage("torpedo <cell>")),

        ("mine", [cell]) => Input::Sonar(SonarCommand::LaunchMine {
            owner,
            target: labels.ok_or(InputError::NoBattleMap)?.parse_cell(cell)?,
        }),
        ("mine", _) => return Err(InputError::Usage("mine <cell>")),

        ("detonate", [uid]) => Input::Sonar(SonarCommand::DetonateMine {
            mine_uid: uid.to_string(),
        }),
        ("detonate", _) => return Err(InputError::Usage("detonate <mine uid>")),

        ("repair", []) => Input::Sonar(SonarCommand::Repair { owner }),

        ("takeoff", [destination]) => Input::Travel(TravelCommand::Takeoff(destination.to_string())),
        ("takeoff", _) => return Err(InputError::Usage("takeoff <planet id>")),

        ("start", [map, name, hp]) => Input::Sonar(SonarCommand::StartBattle {
            map: map.parse::<MapName>()?,
            ship: ShipSpec {
                name: name.to_string(),
                total_hp: parse_hp(hp)?,
                owner: None,
            },
        }),
        ("start", _) => return Err(InputError::Usage("start <alpha|bravo|charlie> <ship name> <hp>")),

        ("end", []) => Input::Sonar(SonarCommand::EndBattle),
        ("show", []) => Input::Show,
        ("status", []) => Input::Status,
        ("help" | "?", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        _ => return Err(InputError::UnknownCommand(line.trim().to_string())),
    };
    Ok(input)
}

fn parse_hp(hp: &str) -> Result<u32, InputError> {
    match hp.parse::<u32>() {
        Ok(hp) if hp > 0 => Ok(hp),
        _ => Err(InputError::InvalidHp(hp.to_string())),
    }
}

/// Start the prompt on its own thread; rustyline blocks while reading.
///
/// Lines arrive on the returned channel, which closes on Ctrl-D, Ctrl-C or
/// a read error.
///
/// # Errors
///
/// Returns `DashboardError::Prompt` when the terminal cannot be set up.
pub async fn spawn_prompt() -> Result<mpsc::UnboundedReceiver<String>, DashboardError> {
    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => {
                let _ = ready_tx.send(Ok(()));
                editor
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if lines_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Prompt error: {}", e);
                    break;
                }
            }
        }
    });

    match ready_rx.await {
        Ok(Ok(())) => Ok(lines_rx),
        Ok(Err(e)) => Err(DashboardError::Prompt(e)),
        Err(_) => Err(DashboardError::Prompt(ReadlineError::Eof)),
    }
}
