use std::str::FromStr;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::{
    board::{Marker, Pos, BOARD_DIMENSION},
    controller::{GameController, Snapshot},
    error::Error,
    game::TurnResult,
    strategy::Difficulty,
};

const HELP: &str = "\
commands:
  a1..c3                          mark a tile (column a-c, row 1-3 from the top)
  reset                           start a new game
  difficulty <easy|intermediate|pro>
  marker <x|o>                    switch sides (starts a new game)
  state                           dump the game state
  help
  quit";

/// A tile name such as `b2`: file (column) first, then rank (row).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TileId(Pos);

impl TileId {
    pub fn pos(self) -> Pos {
        self.0
    }
}

impl FromStr for TileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidTile(s.to_string());
        let mut chars = s.trim().chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let col = match file.to_ascii_lowercase() {
            'a' => 0,
            'b' => 1,
            'c' => 2,
            _ => return Err(invalid()),
        };
        let row = rank
            .to_digit(10)
            .map(|rank| rank as usize)
            .filter(|rank| (1..=BOARD_DIMENSION).contains(rank))
            .ok_or_else(invalid)?
            - 1;
        Ok(TileId((row, col)))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    Mark(TileId),
    Reset,
    Difficulty(Difficulty),
    Marker(Marker),
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = match (words.next(), words.next()) {
            (Some("reset"), None) => Command::Reset,
            (Some("state"), None) => Command::State,
            (Some("help"), None) => Command::Help,
            (Some("quit" | "exit"), None) => Command::Quit,
            (Some("difficulty"), Some(level)) => Command::Difficulty(level.parse()?),
            (Some("marker"), Some(marker)) => Command::Marker(marker.parse()?),
            (Some(tile), None) => Command::Mark(tile.parse()?),
            _ => return Err(Error::InvalidTile(s.trim().to_string())),
        };
        Ok(command)
    }
}

/// Plays against `controller` on stdin/stdout until stdin closes or the
/// player quits. The board is redrawn whenever the controller publishes.
pub async fn play(controller: GameController) -> anyhow::Result<()> {
    let mut updates = controller.subscribe();
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{HELP}\n");
    render(&updates.borrow_and_update());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => run(&controller, command).await?,
                    Err(e) => {
                        warn!(%e, "bad input");
                        println!("{e}");
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run(controller: &GameController, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Mark(tile) => {
            let (row, col) = tile.pos();
            if controller.make_move(row, col).await == TurnResult::Retry {
                println!("Can't play there right now. Try again.");
            }
        }
        Command::Reset => controller.reset_game().await,
        Command::Difficulty(difficulty) => controller.set_difficulty(difficulty).await,
        Command::Marker(marker) => controller.set_user_marker(marker).await,
        Command::State => {
            let snapshot = controller.snapshot().await;
            println!(
                "{}",
                ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())?
            );
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn render(snapshot: &Snapshot) {
    println!("\n{snapshot}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tiles() {
        assert_eq!("a1".parse::<TileId>().unwrap().pos(), (0, 0));
        assert_eq!("C3".parse::<TileId>().unwrap().pos(), (2, 2));
        assert_eq!("b3".parse::<TileId>().unwrap().pos(), (2, 1));
        assert!("d1".parse::<TileId>().is_err());
        assert!("a4".parse::<TileId>().is_err());
        assert!("a0".parse::<TileId>().is_err());
        assert!("a12".parse::<TileId>().is_err());
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "b2".parse::<Command>().unwrap(),
            Command::Mark(TileId((1, 1)))
        );
        assert_eq!("reset".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!(
            "difficulty pro".parse::<Command>().unwrap(),
            Command::Difficulty(Difficulty::Pro)
        );
        assert_eq!(
            "marker o".parse::<Command>().unwrap(),
            Command::Marker(Marker::O)
        );
        assert!(matches!(
            "difficulty impossible".parse::<Command>(),
            Err(Error::UnknownDifficulty(_))
        ));
        assert!("marker".parse::<Command>().is_err());
    }
}
