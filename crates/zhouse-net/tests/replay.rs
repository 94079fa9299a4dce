//! Integration tests replaying Crazyhouse games through the codec, the
//! repetition tracker and the tensor builder.
//!
//! Games are written as UCI move lists and parsed against the board they
//! are played on, so castling, en passant, promotions and drops all reach
//! the codec with their proper move kind.

use std::collections::HashMap;

use zhouse_core::{Board, Color, Move, PieceKind, Square};
use zhouse_net::sample::replay;
use zhouse_net::tensor::PLANES;
use zhouse_net::{
    ACTION_SPACE, GameOutcome, NetError, PositionState, build_input_tensor, decode, decode_on,
    encode,
};

/// Open game with early trades and drops on both sides. Black wins.
const DROP_GAME: &str = "e2e4 e7e5 g1f3 b8c6 f1c4 g8f6 f3g5 d7d5 e4d5 f6d5 g5f7 e8f7 \
     c4d5 c8e6 d5e6 f7e6 N@g5 d8g5 d2d4 g5g2 d1f3 g2h1 e1e2 N@f4 c1f4 e5f4";

/// Endgame with two Black promotions (one under-promotion), castling and a
/// recaptured promoted piece.
const PROMOTION_FEN: &str = "4k3/8/8/8/8/8/1p4p1/R3K2R[] b KQ - 0 1";
const PROMOTION_GAME: &str = "b2a1n e1g1 g2f1q g1f1 R@e2 P@d5 a1b3 f1e2";

/// Opening with an en passant capture.
const EN_PASSANT_GAME: &str = "e2e4 a7a6 e4e5 d7d5 e5d6";

/// Parse `moves` against the positions they are played from.
fn parse_game(start: Board, moves: &str) -> Vec<(Board, Move)> {
    let mut board = start;
    let mut plies = Vec::new();
    for text in moves.split_whitespace() {
        let mv = Move::from_uci(text, &board)
            .unwrap_or_else(|| panic!("unparsable move {text} in {board}"));
        plies.push((board, mv));
        board = board.make_move(mv);
    }
    plies
}

fn all_games() -> Vec<Vec<(Board, Move)>> {
    vec![
        parse_game(Board::starting_position(), DROP_GAME),
        parse_game(PROMOTION_FEN.parse().unwrap(), PROMOTION_GAME),
        parse_game(Board::starting_position(), EN_PASSANT_GAME),
    ]
}

fn final_board(start: Board, moves: &str) -> Board {
    let plies = parse_game(start, moves);
    let (board, mv) = plies.last().copied().unwrap();
    board.make_move(mv)
}

// ── Codec ─────────────────────────────────────────────────────────────────────

#[test]
fn every_played_move_round_trips() {
    for game in all_games() {
        for (board, mv) in game {
            let index = encode(mv).unwrap();
            assert!(index < ACTION_SPACE);
            assert_eq!(decode_on(index, &board).unwrap(), mv, "{mv} in {board}");
        }
    }
}

#[test]
fn played_moves_never_share_an_index() {
    let mut seen: HashMap<usize, (Square, Square, Option<PieceKind>, Option<PieceKind>)> =
        HashMap::new();
    for game in all_games() {
        for (_, mv) in game {
            let shape = (
                mv.source(),
                mv.dest(),
                mv.promotion().map(|p| p.to_piece_kind()),
                mv.drop_piece(),
            );
            let index = encode(mv).unwrap();
            if let Some(previous) = seen.insert(index, shape) {
                assert_eq!(previous, shape, "index {index} reused");
            }
        }
    }
}

#[test]
fn move_kinds_reach_the_codec() {
    let promotion = parse_game(PROMOTION_FEN.parse().unwrap(), PROMOTION_GAME);
    assert!(promotion[0].1.is_promotion());
    assert!(promotion[1].1.is_castle());
    assert!(promotion[4].1.is_drop());

    let ep = parse_game(Board::starting_position(), EN_PASSANT_GAME);
    assert!(ep[4].1.is_en_passant());
}

#[test]
fn black_underpromotion_needs_black_orientation() {
    let mv = Move::from_uci("b2a1n", &PROMOTION_FEN.parse().unwrap()).unwrap();
    let index = encode(mv).unwrap();
    assert_eq!(index, Square::B2.index() * 81 + 64 + 2);

    assert_eq!(decode(index, Color::Black).unwrap(), mv);
    // Read with White orientation the same code points up the board.
    assert_eq!(decode(index, Color::White).unwrap().dest(), Square::C3);
}

#[test]
fn concrete_indices() {
    assert_eq!(encode(Move::new(Square::E2, Square::E4)), Ok(12 * 81 + 1));
    assert_eq!(
        encode(Move::new_drop(PieceKind::Knight, Square::from_index(20).unwrap())),
        Ok(20 * 81 + 77)
    );
    assert!(matches!(
        decode(ACTION_SPACE + 1, Color::White),
        Err(NetError::IndexOutOfRange { .. })
    ));
}

// ── Rules bookkeeping ─────────────────────────────────────────────────────────

#[test]
fn drop_game_pockets() {
    let board = final_board(Board::starting_position(), DROP_GAME);

    assert_eq!(board.pocket(Color::White), [2, 1, 1, 0, 0]);
    assert_eq!(board.pocket(Color::Black), [2, 1, 2, 1, 0]);
    assert_eq!(board.side_to_move(), Color::White);
    assert_eq!(board.fullmove_number(), 14);
}

#[test]
fn promotion_game_final_position() {
    let board = final_board(PROMOTION_FEN.parse().unwrap(), PROMOTION_GAME);

    assert_eq!(board.position_key(), "4k3/8/8/3P4/8/1n~6/4K3/8[Rr] b");
    assert_eq!(board.promoted(), Square::B3.bitboard());
    assert!(board.castling().is_empty());
}

#[test]
fn en_passant_pockets_the_pawn() {
    let board = final_board(Board::starting_position(), EN_PASSANT_GAME);
    assert_eq!(board.pocket_count(Color::White, PieceKind::Pawn), 1);
    assert_eq!(board.piece_on(Square::D5), None);
}

// ── Repetitions ───────────────────────────────────────────────────────────────

#[test]
fn knight_shuffle_repetitions() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let mut state = PositionState::default();
    let start_key = state.board().position_key();
    assert_eq!(state.repetition_count(&start_key), Some(0));

    for expected in 1..=2 {
        for text in shuffle {
            let mv = Move::from_uci(text, state.board()).unwrap();
            state.push(mv);
        }
        assert_eq!(state.repetition_count(&start_key), Some(expected));
        let tensor = build_input_tensor(&state).unwrap();
        assert_eq!(tensor[(12, 0)], expected as f32 / 500.0);
    }
}

#[test]
fn mirrored_states_keep_history() {
    let mut state = PositionState::default();
    for (_, mv) in parse_game(Board::starting_position(), DROP_GAME) {
        state.push(mv);
        let mirrored = state.mirror();
        assert_eq!(mirrored.repetitions(), state.repetitions());
        assert_eq!(
            build_input_tensor(&mirrored).unwrap().plane(12),
            build_input_tensor(&state).unwrap().plane(12)
        );
    }
}

// ── Tensors and samples ───────────────────────────────────────────────────────

#[test]
fn tensors_stay_in_bounds() {
    for game in all_games() {
        let mut state = PositionState::new(game[0].0);
        for (_, mv) in game {
            state.push(mv);
            let tensor = build_input_tensor(&state).unwrap();
            assert_eq!(tensor.planes().count(), PLANES);
            assert!(tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(tensor.plane(12), tensor.plane(13));
            let side = tensor.plane(27);
            assert!(side.iter().all(|&v| v == side[0]));
        }
    }
}

#[test]
fn replay_builds_one_sample_per_ply() {
    let plies = parse_game(Board::starting_position(), DROP_GAME);
    let moves: Vec<Move> = plies.iter().map(|&(_, mv)| mv).collect();
    let samples = replay(Board::starting_position(), &moves, "0-1".parse().unwrap()).unwrap();

    assert_eq!(samples.len(), moves.len());
    for (i, sample) in samples.iter().enumerate() {
        let expected = if i % 2 == 0 { -1.0 } else { 1.0 };
        assert_eq!(sample.value, expected, "ply {i}");
        assert_eq!(sample.action, encode(moves[i]).unwrap());
    }
}

#[test]
fn replay_of_draw_is_neutral() {
    let plies = parse_game(Board::starting_position(), EN_PASSANT_GAME);
    let moves: Vec<Move> = plies.iter().map(|&(_, mv)| mv).collect();
    let samples = replay(Board::starting_position(), &moves, GameOutcome::Draw).unwrap();
    assert!(samples.iter().all(|s| s.value == 0.0));
}
