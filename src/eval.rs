/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, File, Game, Rank, Square};

use crate::{position_key, PositionCache, Score, Strategy};

/// Evaluate `game` from its side-to-move's perspective, consulting `cache` first.
///
/// On a miss, the evaluation is computed and stored in `cache` before being returned.
#[inline(always)]
pub fn evaluate(game: &Game, strategy: &Strategy, cache: &mut PositionCache) -> Score {
    let key = position_key(game);

    if let Some(score) = cache.get(key) {
        return score;
    }

    let score = Evaluator::new(game, strategy).eval();
    cache.put(key, score);
    score
}

/// Encapsulates the logic of scoring a chess position.
///
/// Material and positional sums are computed with White as the positive side.
/// However, during a negamax search, positions must be evaluated from the side-to-move's perspective.
/// That is, if it is Black's turn, a "good" evaluation for Black will be a positive number.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The game whose position to evaluate.
    game: &'a Game,

    /// Piece values and tables to score with.
    strategy: &'a Strategy,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] for `game`, scoring with `strategy`.
    #[inline(always)]
    pub fn new(game: &'a Game, strategy: &'a Strategy) -> Self {
        Self { game, strategy }
    }

    /// Evaluate this position from the side-to-move's perspective.
    ///
    /// A positive/high number is good for the side-to-move, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    #[inline(always)]
    pub fn eval(&self) -> Score {
        let score = self.white_relative();

        match self.game.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// Material plus positional score, where positive is good for White.
    #[inline(always)]
    pub fn white_relative(&self) -> Score {
        self.material() + self.positional()
    }

    /// Sum of piece values, White's added and Black's subtracted.
    pub fn material(&self) -> Score {
        let mut score = Score::DRAW;

        for (_, piece) in self.game.board() {
            let value = self.strategy.value_of(piece.kind());
            if piece.color() == Color::White {
                score += value;
            } else {
                score -= value;
            }
        }

        score
    }

    /// Sum of piece-square bonuses, White's added and Black's subtracted.
    pub fn positional(&self) -> Score {
        let mut score = Score::DRAW;

        for (square, piece) in self.game.board() {
            let value = self.strategy.psqt_value(piece, square);
            if piece.color() == Color::White {
                score += value;
            } else {
                score -= value;
            }
        }

        score
    }

    /// Fetches the contribution of the piece on the specified square, if one exists.
    ///
    /// Only used when printing the evaluator
    #[inline(always)]
    fn value_at(&self, square: Square) -> Option<i32> {
        self.game.piece_at(square).map(|piece| {
            let value =
                self.strategy.value_of(piece.kind()) + self.strategy.psqt_value(piece, square);

            if piece.color() == Color::White {
                value
            } else {
                -value
            }
        })
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.game.side_to_move();

        write!(f, "  +")?;
        for _ in File::iter() {
            write!(f, "-----+")?;
        }
        writeln!(f)?;
        for rank in Rank::iter().rev() {
            write!(f, "{rank} |")?;

            // Step 1: Write the piece char
            for file in File::iter() {
                let square = Square::new(file, rank);
                let piece = self.game.piece_at(square);
                let piece_char = piece.map(|p| p.char()).unwrap_or(' ');
                write!(f, "  {piece_char}  |")?;
            }
            writeln!(f)?;
            write!(f, "  |")?;

            // Step 2: Write the contribution of that piece
            for file in File::iter() {
                let square = Square::new(file, rank);
                let score = match self.value_at(square) {
                    Some(val) if val > 0 => format!("{:^5}", format!("+{val}")),
                    Some(val) => format!("{val:^5}"),
                    None => String::from("     "),
                };
                write!(f, "{score}|")?;
            }
            writeln!(f)?;

            write!(f, "  +")?;
            for _ in File::iter() {
                write!(f, "-----+")?;
            }
            writeln!(f)?;
        }
        for file in File::iter() {
            write!(f, "     {file}")?;
        }

        let score = self.eval();

        let winning_side = if score > Score::DRAW {
            Some(color)
        } else if score < Score::DRAW {
            Some(color.opponent())
        } else {
            None
        };

        writeln!(f, "\n\nMaterial: {}", self.material())?;
        writeln!(f, "Positional: {}", self.positional())?;
        writeln!(
            f,
            "Winning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )?;
        write!(f, "Score ({}): {score}", color.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rotates a FEN's board by 180 degrees and swaps the colors of every piece and the side to move.
    ///
    /// Castling rights and en passant are dropped, as the rotated position has none.
    fn mirror_fen(fen: &str) -> String {
        let mut parts = fen.split_ascii_whitespace();
        let placement = parts.next().unwrap();
        let stm = parts.next().unwrap_or("w");

        let ranks = placement
            .split('/')
            .rev()
            .map(|rank| {
                rank.chars()
                    .rev()
                    .map(|c| {
                        if c.is_ascii_uppercase() {
                            c.to_ascii_lowercase()
                        } else {
                            c.to_ascii_uppercase()
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/");

        let stm = if stm == "w" { "b" } else { "w" };

        format!("{ranks} {stm} - - 0 1")
    }

    const FENS: &[&str] = &[
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "6k1/8/8/3q4/8/8/8/3R2K1 w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 b - - 0 10",
    ];

    #[test]
    fn test_startpos_is_balanced() {
        let game = Game::default();
        let strategy = Strategy::default();
        let evaluator = Evaluator::new(&game, &strategy);

        assert_eq!(evaluator.material(), Score::DRAW);
        assert_eq!(evaluator.positional(), Score::DRAW);
        assert_eq!(evaluator.eval(), Score::DRAW);
    }

    #[test]
    fn test_material_counts_both_sides() {
        // White has an extra rook
        let game = Game::from_fen("6k1/8/8/8/8/8/8/R5K1 b - - 0 1").unwrap();
        let strategy = Strategy::default();
        let evaluator = Evaluator::new(&game, &strategy);

        assert_eq!(evaluator.material(), Score(500));

        // Black is to move, so the extra rook is bad news
        assert!(evaluator.eval() < Score::DRAW);
        assert_eq!(evaluator.eval(), -evaluator.white_relative());
    }

    #[test]
    fn test_eval_is_symmetric() {
        for color in [Color::White, Color::Black] {
            let strategy = Strategy::new(color);

            for fen in FENS {
                let game = Game::from_fen(fen).unwrap();
                let mirrored = Game::from_fen(&mirror_fen(fen)).unwrap();

                let original = Evaluator::new(&game, &strategy);
                let flipped = Evaluator::new(&mirrored, &strategy);

                assert_eq!(
                    original.white_relative(),
                    -flipped.white_relative(),
                    "{fen} and its mirror {} are not scored symmetrically",
                    mirror_fen(fen)
                );

                // Side-to-move is swapped too, so the relative scores agree
                assert_eq!(original.eval(), flipped.eval());
            }
        }
    }

    #[test]
    fn test_orientations_evaluate_identically() {
        let white = Strategy::new(Color::White);
        let black = Strategy::new(Color::Black);

        for fen in FENS {
            let game = Game::from_fen(fen).unwrap();
            assert_eq!(
                Evaluator::new(&game, &white).eval(),
                Evaluator::new(&game, &black).eval(),
                "{fen}"
            );
        }
    }

    #[test]
    fn test_cache_is_transparent() {
        let strategy = Strategy::default();
        let mut cache = PositionCache::new(64);

        for fen in FENS {
            let game = Game::from_fen(fen).unwrap();
            let uncached = Evaluator::new(&game, &strategy).eval();

            let first = evaluate(&game, &strategy, &mut cache);
            let hits = cache.hits();
            let second = evaluate(&game, &strategy, &mut cache);

            assert_eq!(first, uncached);
            assert_eq!(first, second);
            assert_eq!(cache.hits(), hits + 1, "Second evaluation of {fen} should hit");
        }
    }

    #[test]
    fn test_pretty_print_reports_score() {
        let game = Game::default();
        let strategy = Strategy::default();
        let pretty = Evaluator::new(&game, &strategy).to_string();

        assert!(pretty.contains("Winning side: N/A"));
        assert!(pretty.ends_with("): 0"), "{pretty}");
    }
}
