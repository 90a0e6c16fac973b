//! Whole-game scenarios through the controller.

use omok::game_controller::{GameController, GameStatus, MoveResult, Strategy};
use omok::games::gomoku::{Board, GomokuMove, GomokuState, Player, BOARD_SIZE};

#[test]
fn human_five_ends_the_game_without_another_search() {
    let mut controller = GameController::new(Strategy::AlphaBeta { max_depth: 3 });
    let replies = [(0, 0), (0, 2), (0, 4), (0, 6)];

    for (i, col) in (3..7).enumerate() {
        assert!(matches!(
            controller.apply_human_move(7, col),
            MoveResult::Success { game_over: false, .. }
        ));
        let (r, c) = replies[i];
        controller.apply_trusted_move(GomokuMove(r, c)).unwrap();
    }

    match controller.apply_human_move(7, 7) {
        MoveResult::Success {
            player,
            game_over,
            winner,
            ..
        } => {
            assert_eq!(player, Player::Black);
            assert!(game_over);
            assert_eq!(winner, Some(Player::Black));
        }
        other => panic!("expected the winning move to be accepted, got {other:?}"),
    }
    assert!(controller.get_render_state().board().check_win(Player::Black));
    assert_eq!(controller.get_status(), GameStatus::Win(Player::Black));

    assert!(matches!(controller.play_computer_move().unwrap(), MoveResult::GameOver));
    assert_eq!(controller.searches_run(), 0);
    assert_eq!(controller.move_count(), 9);
    assert!(controller.format_history().contains("Result: Human wins!"));
}

#[test]
fn computer_blocks_an_open_end() {
    let mut controller = GameController::new(Strategy::AlphaBeta { max_depth: 1 });
    let replies = [(7, 2), (0, 0), (0, 14)];
    for (i, col) in (3..6).enumerate() {
        controller.apply_human_move(7, col);
        let (r, c) = replies[i];
        controller.apply_trusted_move(GomokuMove(r, c)).unwrap();
    }
    controller.apply_human_move(7, 6);

    match controller.play_computer_move().unwrap() {
        MoveResult::Success { move_made, game_over, .. } => {
            assert_eq!(move_made, GomokuMove(7, 7));
            assert!(!game_over);
        }
        other => panic!("expected a computer move, got {other:?}"),
    }
}

/// Every cell filled with runs of at most two in any direction
fn drawn_board_but_one(empty: (usize, usize)) -> Board {
    let mut board = Board::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            if (row, col) == empty {
                continue;
            }
            let player = if (col / 2 + row) % 2 == 1 {
                Player::Black
            } else {
                Player::White
            };
            board.place(row, col, player).unwrap();
        }
    }
    board
}

#[test]
fn full_board_without_five_is_a_draw() {
    let last = (BOARD_SIZE - 1, BOARD_SIZE - 1);
    let board = drawn_board_but_one(last);
    assert!(!board.is_full());
    assert!(!board.check_win(Player::Black));
    assert!(!board.check_win(Player::White));

    let state = GomokuState::from_board(board, Player::Black);
    let mut controller = GameController::from_state(state, Player::Black, Strategy::AlphaBeta { max_depth: 3 });
    assert_eq!(controller.get_status(), GameStatus::InProgress);

    match controller.apply_human_move(last.0, last.1) {
        MoveResult::Success { game_over, winner, .. } => {
            assert!(game_over);
            assert_eq!(winner, None);
        }
        other => panic!("expected the last cell to be accepted, got {other:?}"),
    }
    let board = controller.get_render_state().board();
    assert!(board.is_full());
    assert!(!board.check_win(Player::Black));
    assert!(!board.check_win(Player::White));
    assert_eq!(controller.get_status(), GameStatus::Draw);
    assert!(matches!(controller.play_computer_move().unwrap(), MoveResult::GameOver));
    assert_eq!(controller.searches_run(), 0);
}

#[test]
fn search_on_a_finished_position_is_refused() {
    let mut full = drawn_board_but_one((0, 0));
    full.place(0, 0, Player::White).unwrap();
    let state = GomokuState::from_board(full, Player::Black);
    assert!(matches!(
        omok::alphabeta::best_move(&state, 3),
        Err(omok::Error::NoLegalMoves)
    ));
    assert!(matches!(
        omok::MCTS::new(omok::MctsConfig::default()).run(&state),
        Err(omok::Error::NoSearchPossible)
    ));
}
