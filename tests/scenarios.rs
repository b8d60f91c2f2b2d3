/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessie::{Color, Game};
use pawnstorm::{evaluate, outcome, select_move, Outcome, PositionCache, Score, Strategy};

fn select(fen: &str, color: Color, depth: usize, lines: usize) -> String {
    let game = Game::from_fen(fen).unwrap();
    let strategy = Strategy::new(color).with_depth(depth).with_lines(lines);
    let mut cache = PositionCache::default();

    select_move(&game, &strategy, &mut cache)
        .unwrap_or_else(|| panic!("No move selected for {fen}"))
        .to_string()
}

#[test]
fn test_opening_move_keeps_material_safe() {
    let game = Game::default();
    let strategy = Strategy::new(Color::White).with_depth(1).with_lines(20);
    let mut cache = PositionCache::default();

    let mv = select_move(&game, &strategy, &mut cache).unwrap();
    assert!(game.get_legal_moves().into_iter().any(|legal| legal == mv));

    // Black must not be able to win anything in reply
    let after = game.with_move_made(mv);
    assert!(
        after.get_legal_moves().into_iter().all(|reply| !reply.is_capture()),
        "{mv} hangs material"
    );
}

#[test]
fn test_forced_move_is_always_played() {
    let fen = "k7/8/8/8/8/8/1r6/K7 w - - 0 1";
    assert_eq!(Game::from_fen(fen).unwrap().get_legal_moves().len(), 1);

    for depth in [0, 1, 2, 3] {
        for lines in [1, 2, 5, 20] {
            assert_eq!(
                select(fen, Color::White, depth, lines),
                "a1b2",
                "depth {depth}, lines {lines}"
            );
        }
    }
}

#[test]
fn test_free_queen_is_captured() {
    let fen = "6k1/8/8/3q4/8/8/8/3R2K1 w - - 0 1";

    for depth in [1, 2, 3] {
        for lines in [2, 5, 20] {
            assert_eq!(
                select(fen, Color::White, depth, lines),
                "d1d5",
                "depth {depth}, lines {lines}"
            );
        }
    }
}

#[test]
fn test_black_engine_captures_free_queen() {
    let fen = "3r2k1/8/8/8/3Q4/8/8/6K1 b - - 0 1";
    assert_eq!(select(fen, Color::Black, 2, 5), "d8d4");
}

#[test]
fn test_finished_games_have_no_move() {
    let mut cache = PositionCache::default();
    let strategy = Strategy::default();

    // Fool's mate
    let mated = Game::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
        .unwrap();
    assert_eq!(outcome(&mated), Outcome::BlackWins);
    assert!(select_move(&mated, &strategy, &mut cache).is_none());

    let stalemate = Game::from_fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(outcome(&stalemate), Outcome::Draw);
    assert!(select_move(&stalemate, &strategy, &mut cache).is_none());
}

#[test]
fn test_evaluation_is_relative_to_side_to_move() {
    let mut cache = PositionCache::default();
    let strategy = Strategy::default();

    let white = Game::from_fen("6k1/8/8/3q4/8/8/8/3R2K1 w - - 0 1").unwrap();
    let black = Game::from_fen("6k1/8/8/3q4/8/8/8/3R2K1 b - - 0 1").unwrap();

    let white_score = evaluate(&white, &strategy, &mut cache);
    let black_score = evaluate(&black, &strategy, &mut cache);

    assert!(white_score < Score::DRAW);
    assert_eq!(white_score, -black_score);
}
