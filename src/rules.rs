/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, Game};

/// State of a game, as far as the rules of chess are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The game has not concluded.
    InProgress,

    /// White has checkmated Black.
    WhiteWins,

    /// Black has checkmated White.
    BlackWins,

    /// Stalemate, fifty-move rule, or insufficient material.
    Draw,
}

impl Outcome {
    /// Returns `true` if the game has concluded.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The winning color, if there is one.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::WhiteWins => Some(Color::White),
            Self::BlackWins => Some(Color::Black),
            _ => None,
        }
    }

    /// An outcome where `color` has won.
    #[inline(always)]
    const fn won_by(color: Color) -> Self {
        match color {
            Color::White => Self::WhiteWins,
            Color::Black => Self::BlackWins,
        }
    }
}

impl fmt::Display for Outcome {
    /// Displays the outcome in PGN result notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            Self::InProgress => "*",
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
        };

        write!(f, "{result}")
    }
}

/// Determine whether `game` has concluded and, if so, how.
pub fn outcome(game: &Game) -> Outcome {
    if game.get_legal_moves().is_empty() {
        if game.is_in_check() {
            // The side to move has been mated
            Outcome::won_by(game.side_to_move().opponent())
        } else {
            Outcome::Draw
        }
    } else if game.can_draw_by_fifty() || game.can_draw_by_insufficient_material() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

/// Fetch the key under which a position's evaluation is cached.
#[inline(always)]
pub fn position_key(game: &Game) -> u64 {
    game.key().inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_of(fen: &str) -> Outcome {
        let game = Game::from_fen(fen).unwrap();
        outcome(&game)
    }

    #[test]
    fn test_checkmate() {
        // Back-rank mate delivered by White
        assert_eq!(outcome_of("6k1/5ppp/8/8/8/8/8/3R2K1 b - - 0 1"), Outcome::InProgress);
        assert_eq!(outcome_of("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"), Outcome::WhiteWins);

        // Fool's mate
        let fools_mate = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert_eq!(outcome_of(fools_mate), Outcome::BlackWins);
        assert_eq!(outcome_of(fools_mate).winner(), Some(Color::Black));
    }

    #[test]
    fn test_draws() {
        // Stalemate
        assert_eq!(outcome_of("k7/8/KQ6/8/8/8/8/8 b - - 0 1"), Outcome::Draw);

        // Lone kings
        assert_eq!(outcome_of("8/4k3/8/8/3K4/8/8/8 w - - 0 1"), Outcome::Draw);

        // Fifty-move rule
        assert_eq!(outcome_of("8/4k3/8/8/3K4/8/R7/8 w - - 100 80"), Outcome::Draw);
    }

    #[test]
    fn test_startpos_in_progress() {
        let outcome = outcome(&Game::default());
        assert!(!outcome.is_over());
        assert_eq!(outcome.to_string(), "*");
        assert_eq!(Outcome::Draw.to_string(), "1/2-1/2");
    }

    #[test]
    fn test_keys_change_with_moves() {
        let game = Game::default();
        let mv = game.get_legal_moves().into_iter().next().unwrap();
        let child = game.with_move_made(mv);

        assert_ne!(position_key(&game), position_key(&child));
        assert_eq!(position_key(&game), position_key(&Game::default()));
    }
}
