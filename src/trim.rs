/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Game, Move};

use crate::{evaluate, PositionCache, Score, Strategy};

/// A candidate move, paired with a one-ply estimate of how good it is for the side making it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoredMove {
    /// The move to play.
    pub mv: Move,

    /// Static evaluation of the position after `mv`, from the mover's perspective.
    pub score: Score,
}

impl fmt::Display for ScoredMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.mv, self.score)
    }
}

/// Ranks every legal move in `game` by a one-ply static lookahead and keeps only the best [`Strategy::lines`].
///
/// Each move is applied to a copy of `game` and the resulting position is evaluated.
/// Since that evaluation is from the opponent's perspective, it is negated to rank moves for the side-to-move.
///
/// Moves are returned best-first. Ties keep the order in which moves were generated.
/// If there are no legal moves, the list is empty.
pub fn trim(game: &Game, strategy: &Strategy, cache: &mut PositionCache) -> Vec<ScoredMove> {
    let mut candidates = game
        .get_legal_moves()
        .into_iter()
        .map(|mv| {
            let child = game.with_move_made(mv);
            let score = -evaluate(&child, strategy, cache);
            ScoredMove { mv, score }
        })
        .collect::<Vec<_>>();

    // Stable, so equal scores stay in generation order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(strategy.lines());

    candidates
}
