use jkfplayer::jkf::{JsonKifu, MoveFormat, MoveNode, Special};
use jkfplayer::{Player, PlayerError, Square};

// Navigation over the main line and recorded forks

fn board_move(from: (u8, u8), to: (u8, u8)) -> MoveNode {
    MoveNode::from_move(MoveFormat::board(Square::new(from.0, from.1), Square::new(to.0, to.1)))
}

/// 7六歩 3四歩 2六歩, with 8四歩 recorded as an alternative at ply 2
fn forked_record() -> JsonKifu {
    let mut kifu = JsonKifu::from_moves(vec![
        board_move((7, 7), (7, 6)),
        board_move((3, 3), (3, 4)),
        board_move((2, 7), (2, 6)),
    ]);
    kifu.moves[2].forks.push(vec![board_move((8, 3), (8, 4)), board_move((2, 7), (2, 6))]);
    kifu
}

#[test]
fn test_forward_to_end_and_back_restores_position() {
    let mut player = Player::new(forked_record()).expect("hirate record");
    let initial = player.get_state();
    let max = player.get_max_ply().unwrap();
    assert_eq!(max, 3, "three moves on the main line");

    for ply in 1..=max {
        assert!(player.forward().unwrap(), "forward to ply {} should succeed", ply);
    }
    assert!(!player.forward().unwrap(), "no ply after the end of the line");
    assert_ne!(player.get_state(), initial);

    for ply in (0..max).rev() {
        assert!(player.backward().unwrap(), "backward to ply {} should succeed", ply);
    }
    assert!(!player.backward().unwrap(), "no ply before 0");
    assert_eq!(player.get_state(), initial, "replaying back must restore the initial position");
}

#[test]
fn test_goto_is_idempotent() {
    let mut player = Player::new(forked_record()).unwrap();
    player.goto(2).unwrap();
    let state = player.get_state();
    let depth = player.path_stack().depth();

    player.goto(2).unwrap();
    assert_eq!(player.tesuu(), 2);
    assert_eq!(player.get_state(), state);
    assert_eq!(player.path_stack().depth(), depth);
}

#[test]
fn test_goto_past_end_stops_at_last_ply() {
    let mut player = Player::new(forked_record()).unwrap();
    player.goto(99).unwrap();
    assert_eq!(player.tesuu(), 3);
    player.go(-1).unwrap();
    assert_eq!(player.tesuu(), 2);
}

#[test]
fn test_single_move_record() {
    let mut player = Player::new(JsonKifu::from_moves(vec![board_move((7, 7), (7, 6))])).unwrap();

    assert!(player.forward().unwrap(), "first forward applies the move");
    assert_eq!(player.tesuu(), 1);
    let after_move = player.get_state();

    assert!(!player.forward().unwrap(), "second forward has nothing to play");
    assert_eq!(player.tesuu(), 1);
    assert_eq!(player.get_state(), after_move);
}

#[test]
fn test_fork_selection_is_forgotten_behind_branch_point() {
    let mut player = Player::new(forked_record()).unwrap();
    player.forward().unwrap();

    assert!(player.fork_and_forward(0).unwrap(), "fork 0 exists at ply 2");
    assert_eq!(player.tesuu(), 2);
    assert_eq!(player.path_stack().depth(), 2);
    assert_eq!(
        player.get_move(None).unwrap().map(|mv| mv.to),
        Some(Square::new(8, 4)),
        "cursor is on the fork's first move"
    );
    assert_eq!(player.get_max_ply().unwrap(), 3, "fork holds two moves");

    player.backward().unwrap();
    player.backward().unwrap();
    assert_eq!(player.tesuu(), 0);
    assert_eq!(player.path_stack().depth(), 1, "only the main line frame remains");
    assert_eq!(player.get_move(2).unwrap().map(|mv| mv.to), Some(Square::new(3, 4)));
}

#[test]
fn test_fork_and_forward_without_fork_changes_nothing() {
    let mut player = Player::new(forked_record()).unwrap();
    assert!(!player.fork_and_forward(0).unwrap(), "ply 1 has no forks");
    assert_eq!(player.tesuu(), 0);
    assert_eq!(player.path_stack().depth(), 1);

    player.goto(3).unwrap();
    assert!(!player.fork_and_forward(0).unwrap(), "no node after the last ply");
}

#[test]
fn test_lookup_past_selected_line_is_invalid_ply() {
    let player = Player::new(forked_record()).unwrap();
    assert!(matches!(player.get_move(4), Err(PlayerError::InvalidPly(4))));
    assert!(player.get_move(0).unwrap().is_none(), "ply 0 carries no move");
}

#[test]
fn test_fork_lookup_at_largest_ply_is_invalid_ply() {
    let player = Player::new(forked_record()).unwrap();
    assert!(matches!(player.get_next_fork(usize::MAX), Err(PlayerError::InvalidPly(usize::MAX))));
    assert!(player.get_readable_fork_kifu(usize::MAX).is_err());
}

#[test]
fn test_illegal_recorded_move_stops_navigation() {
    let kifu = JsonKifu::from_moves(vec![board_move((7, 7), (7, 6)), board_move((5, 5), (5, 4))]);
    let mut player = Player::new(kifu).unwrap();
    player.forward().unwrap();
    let state = player.get_state();

    assert!(matches!(player.forward(), Err(PlayerError::IllegalMove(_))));
    assert_eq!(player.tesuu(), 1, "cursor does not move past an illegal move");
    assert_eq!(player.get_state(), state);
}

#[test]
fn test_terminal_node_is_reachable() {
    let kifu = JsonKifu::from_moves(vec![
        board_move((7, 7), (7, 6)),
        MoveNode::from_special(Special::Resign),
    ]);
    let mut player = Player::new(kifu).unwrap();
    player.goto(2).unwrap();
    assert_eq!(player.tesuu(), 2);
    assert!(player.get_move(None).unwrap().is_none());
}

#[test]
fn test_parse_and_navigate_jkf_text() {
    let text = r#"{
        "header": {"先手": "A", "後手": "B"},
        "moves": [
            {},
            {"move": {"from": {"x": 7, "y": 7}, "to": {"x": 7, "y": 6}, "piece": "FU"}},
            {"move": {"from": {"x": 3, "y": 3}, "to": {"x": 3, "y": 4}, "piece": "FU"},
             "forks": [[{"move": {"from": {"x": 8, "y": 3}, "to": {"x": 8, "y": 4}, "piece": "FU"}}]]}
        ]
    }"#;
    let mut player = Player::parse(text).expect("valid JKF");
    player.forward().unwrap();
    assert!(player.fork_and_forward(0).unwrap());
    assert_eq!(player.get_board(8, 4).map(|p| p.kind), Some(jkfplayer::Kind::Pawn));
    assert!(player.get_board(8, 3).is_none());
}

#[test]
fn test_handicap_record_starts_with_white() {
    let text = r#"{"initial": {"preset": "KA"}, "moves": [{}]}"#;
    let player = Player::parse(text).unwrap();
    assert_eq!(player.get_state().color, jkfplayer::Color::White);
    assert!(player.get_board(2, 2).is_none(), "bishop handicap removes white's bishop");
}
