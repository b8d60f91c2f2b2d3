/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessie::{Game, Move};

use crate::{evaluate, trim, PositionCache, Score, ScoredMove, SearchBounds, Strategy};

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    ///
    /// `None` if the position had no legal moves.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made, from the root side-to-move's perspective.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Select the strongest move in `game` according to `strategy`.
///
/// Returns `None` if there are no legal moves; callers should check the game's outcome before asking for a move.
#[inline(always)]
pub fn select_move(game: &Game, strategy: &Strategy, cache: &mut PositionCache) -> Option<Move> {
    Search::new(strategy, cache).select_move(game).bestmove
}

/// Executes a fixed-depth, trimmed-breadth search.
///
/// Every move explored is applied to its own copy of the game, so no two branches share state.
/// The only thing shared across the whole tree is the position cache.
pub struct Search<'a> {
    /// Piece values, tables, breadth and depth to search with.
    strategy: &'a Strategy,

    /// Scores of previously evaluated positions.
    cache: &'a mut PositionCache,

    /// Number of nodes visited so far.
    nodes: u64,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] using `strategy`, storing evaluations in `cache`.
    #[inline(always)]
    pub fn new(strategy: &'a Strategy, cache: &'a mut PositionCache) -> Self {
        Self {
            strategy,
            cache,
            nodes: 0,
        }
    }

    /// Number of nodes visited by this search so far.
    #[inline(always)]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Choose the best move at the root of the tree.
    ///
    /// Every trimmed root candidate is searched [`Strategy::depth`] plies deeper,
    /// raising alpha as better candidates are found. Ties go to the earlier candidate.
    pub fn select_move(&mut self, game: &Game) -> SearchResult {
        let mut res = SearchResult::default();
        let mut bounds = SearchBounds::FULL;

        for ScoredMove { mv, .. } in self.trim(game) {
            let child = game.with_move_made(mv);
            let score = -self.alpha_beta(&child, -bounds, self.strategy.depth(), 1);

            if res.bestmove.is_none() || score > res.score {
                res.bestmove = Some(mv);
                res.score = score;
            }

            if score > bounds.alpha {
                bounds.alpha = score;
            }
        }

        res.nodes = self.nodes;
        res
    }

    /// Fixed-depth [negamax](https://www.chessprogramming.org/Negamax) with [alpha-beta pruning](https://www.chessprogramming.org/Alpha-Beta),
    /// over trimmed candidate moves.
    ///
    /// At `depth == 0`, the position is handed to [`Search::quiesce`].
    pub fn alpha_beta(
        &mut self,
        game: &Game,
        mut bounds: SearchBounds,
        depth: usize,
        ply: i32,
    ) -> Score {
        self.nodes += 1;

        if depth == 0 {
            return self.quiesce(game, bounds);
        }

        let candidates = self.trim(game);

        // If there are no legal moves, it's either mate or a draw.
        if candidates.is_empty() {
            return if game.is_in_check() {
                // Prefer earlier mates
                -Score::MATE + ply
            } else {
                Score::DRAW
            };
        }

        // Start with a *really bad* initial score
        let mut best = -Score::INF;

        for ScoredMove { mv, .. } in candidates {
            let child = game.with_move_made(mv);
            let score = -self.alpha_beta(&child, -bounds, depth - 1, ply + 1);

            // Our opponent would never allow this line, so the remaining siblings are irrelevant
            if score >= bounds.beta {
                return score;
            }

            if score > best {
                best = score;
            }

            if score > bounds.alpha {
                bounds.alpha = score;
            }
        }

        best
    }

    /// [Quiescence search](https://www.chessprogramming.org/Quiescence_Search): keep searching captures until the position is quiet.
    ///
    /// Only the trimmed candidates that are captures are explored,
    /// so a capture outside the top [`Strategy::lines`] moves is never looked at.
    pub fn quiesce(&mut self, game: &Game, mut bounds: SearchBounds) -> Score {
        self.nodes += 1;

        // Evaluate the current position, to serve as our baseline
        let stand_pat = self.evaluate(game);

        // Beta cutoff; this position is "too good" and our opponent would never let us get here
        if stand_pat >= bounds.beta {
            return bounds.beta;
        }

        if stand_pat > bounds.alpha {
            bounds.alpha = stand_pat;
        }

        let captures = self
            .trim(game)
            .into_iter()
            .filter(|candidate| candidate.mv.is_capture());

        for ScoredMove { mv, .. } in captures {
            let child = game.with_move_made(mv);
            let score = -self.quiesce(&child, -bounds);

            if score >= bounds.beta {
                return bounds.beta;
            }

            if score > bounds.alpha {
                bounds.alpha = score;
            }
        }

        bounds.alpha
    }

    /// Static evaluation of `game`, through the cache.
    #[inline(always)]
    fn evaluate(&mut self, game: &Game) -> Score {
        evaluate(game, self.strategy, self.cache)
    }

    /// Trimmed candidate moves of `game`, best-first.
    #[inline(always)]
    fn trim(&mut self, game: &Game) -> Vec<ScoredMove> {
        trim(game, self.strategy, self.cache)
    }
}
