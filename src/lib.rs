/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Position cache with least-recently-used eviction.
mod cache;

/// Command-line interface and engine-specific commands.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Piece-square tables.
mod psqt;

/// Game outcomes and position identity.
mod rules;

/// Scores and search windows.
mod score;

/// Main engine logic; all search related code.
mod search;

/// Tunable parameters of play, oriented to a color.
mod strategy;

/// Pruning of candidate moves by a one-ply lookahead.
mod trim;

/// Misc utility functions, constants, and types.
mod utils;

pub use cache::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use psqt::*;
pub use rules::*;
pub use score::*;
pub use search::*;
pub use strategy::*;
pub use trim::*;
pub use utils::*;
