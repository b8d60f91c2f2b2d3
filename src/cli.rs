/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use chessie::Color;
use clap::{builder::PossibleValue, Parser, ValueEnum};
use uci_parser::UciCommand;

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <UCI COMMAND>")
)]
pub enum EngineCommand {
    /// Run a benchmark with the provided parameters.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the configured search depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Show the trimmed candidate moves for the current position, best first, with their one-ply scores.
    #[command(aliases = ["cands", "c"])]
    Candidates,

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, every piece's contribution to the score will be printed.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Display information about the engine's position cache.
    #[command(aliases = ["hash", "cache"])]
    HashInfo,

    /// Apply the provided move to the game, if it is legal.
    ///
    /// While playing a game against the engine, the engine will respond with its own move.
    #[command(aliases = ["move", "m"])]
    MakeMove { mv_string: String },

    /// Shows all legal moves in the current position.
    Moves,

    /// Display the current value of the specified option.
    Option {
        name: Vec<String>, // This is a vector in order to support multi-word options
    },

    /// Start a new game against the engine.
    ///
    /// Enter your moves with `makemove`. The engine answers automatically.
    Play {
        /// The color the engine plays.
        #[arg(default_value = "black")]
        engine: PlayerColor,
    },

    /// Wrapper over UCI commands sent to the engine.
    #[command(skip)]
    Uci { cmd: UciCommand },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a [`UciCommand`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                // If parsing failed, attempt to parse as a UciCommand
                if let Ok(cmd) = UciCommand::new(s) {
                    Ok(Self::Uci { cmd })
                } else {
                    Err(e)
                }
            }
        }
    }
}

/// A side of the board, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerColor(pub Color);

impl From<PlayerColor> for Color {
    #[inline(always)]
    fn from(value: PlayerColor) -> Self {
        value.0
    }
}

impl ValueEnum for PlayerColor {
    fn value_variants<'a>() -> &'a [Self] {
        &[PlayerColor(Color::White), PlayerColor(Color::Black)]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self.0 {
            Color::White => PossibleValue::new("white").aliases(["w", "White"]),
            Color::Black => PossibleValue::new("black").aliases(["b", "Black"]),
        };

        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_commands() {
        let cmd: EngineCommand = "play white".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Play { engine } if engine.0 == Color::White));

        let cmd: EngineCommand = "play".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Play { engine } if engine.0 == Color::Black));

        let cmd: EngineCommand = "makemove e2e4".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::MakeMove { mv_string } if mv_string == "e2e4"));

        let cmd: EngineCommand = "bench --depth 2".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Bench { depth: Some(2), pretty: false }));
    }

    #[test]
    fn test_falls_back_to_uci() {
        let cmd: EngineCommand = "isready".parse().unwrap();
        assert!(matches!(cmd, EngineCommand::Uci { cmd: UciCommand::IsReady }));

        assert!("definitely not a command".parse::<EngineCommand>().is_err());
    }
}
