use super::Player;
use crate::jkf::{BoardCell, StateFormat};
use crate::readable::renderer::num_to_kan;
use crate::shogi::{Color, Kind, RulesEngine, Square};

impl<E: RulesEngine> Player<E> {
    /// Snapshot of the current position, independent of the player
    pub fn get_state(&self) -> StateFormat {
        snapshot(&self.engine)
    }
}

pub fn snapshot<E: RulesEngine>(engine: &E) -> StateFormat {
    let board = (1..=9)
        .map(|x| {
            (1..=9)
                .map(|y| BoardCell::from(engine.get(Square::new(x, y))))
                .collect()
        })
        .collect();
    StateFormat {
        color: engine.turn(),
        board,
        hands: [engine.hand_counts(Color::Black), engine.hand_counts(Color::White)],
    }
}

/// Single-character board glyph
fn glyph(kind: Kind) -> char {
    match kind {
        Kind::Pawn => '歩',
        Kind::Lance => '香',
        Kind::Knight => '桂',
        Kind::Silver => '銀',
        Kind::Gold => '金',
        Kind::Bishop => '角',
        Kind::Rook => '飛',
        Kind::King => '玉',
        Kind::PromotedPawn => 'と',
        Kind::PromotedLance => '杏',
        Kind::PromotedKnight => '圭',
        Kind::PromotedSilver => '全',
        Kind::Horse => '馬',
        Kind::Dragon => '龍',
    }
}

fn count_to_kan(count: u32) -> String {
    match count {
        0..=9 => num_to_kan(count as u8).to_string(),
        10 => "十".to_string(),
        _ => format!("十{}", num_to_kan((count % 10) as u8)),
    }
}

fn hand_line(state: &StateFormat, color: Color) -> String {
    let label = match color {
        Color::Black => "先手の持駒：",
        Color::White => "後手の持駒：",
    };
    let held: Vec<String> = Kind::HAND_KINDS
        .iter()
        .rev()
        .filter_map(|kind| {
            let count = state.hands[color.index()].get(kind).copied().unwrap_or(0);
            match count {
                0 => None,
                1 => Some(glyph(*kind).to_string()),
                n => Some(format!("{}{}", glyph(*kind), count_to_kan(n))),
            }
        })
        .collect();
    if held.is_empty() {
        format!("{}なし", label)
    } else {
        format!("{}{}", label, held.join("　"))
    }
}

impl StateFormat {
    /// Board diagram in the usual kifu layout, white's pieces marked `v`
    pub fn display_board(&self) -> String {
        let mut out = String::new();
        out.push_str(&hand_line(self, Color::White));
        out.push('\n');
        out.push_str("  ９ ８ ７ ６ ５ ４ ３ ２ １\n");
        out.push_str("+---------------------------+\n");

        for y in 1..=9u8 {
            out.push('|');
            for x in (1..=9u8).rev() {
                let cell = self
                    .board
                    .get(x as usize - 1)
                    .and_then(|file| file.get(y as usize - 1))
                    .and_then(BoardCell::piece);
                match cell {
                    Some(piece) => {
                        out.push(if piece.color == Color::White { 'v' } else { ' ' });
                        out.push(glyph(piece.kind));
                    }
                    None => out.push_str(" ・"),
                }
            }
            out.push('|');
            out.push(num_to_kan(y));
            out.push('\n');
        }

        out.push_str("+---------------------------+\n");
        out.push_str(&hand_line(self, Color::Black));
        out.push('\n');
        let turn = match self.color {
            Color::Black => "先手番",
            Color::White => "後手番",
        };
        out.push_str(turn);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jkf::{JsonKifu, MoveFormat, MoveNode};

    #[test]
    fn test_snapshot_of_initial_position() {
        let player = Player::new(JsonKifu::new()).unwrap();
        let state = player.get_state();
        assert_eq!(state.color, Color::Black);
        assert_eq!(state.board.len(), 9);
        assert!(state.board.iter().all(|file| file.len() == 9));
        assert_eq!(state.board[4][8].kind, Some(Kind::King));
        assert_eq!(state.board[4][8].color, Some(Color::Black));
        assert_eq!(state.board[4][4], BoardCell::default());
        assert_eq!(state.hands[0].get(&Kind::Pawn).copied().unwrap_or(0), 0);
    }

    #[test]
    fn test_snapshot_is_detached_from_player() {
        let kifu = JsonKifu::from_moves(vec![MoveNode::from_move(MoveFormat::board(
            Square::new(7, 7),
            Square::new(7, 6),
        ))]);
        let mut player = Player::new(kifu).unwrap();
        let before = player.get_state();
        player.forward().unwrap();
        assert_eq!(before.board[6][6].kind, Some(Kind::Pawn));
        assert_eq!(player.get_state().board[6][6], BoardCell::default());
        assert_eq!(player.get_state().color, Color::White);
    }

    #[test]
    fn test_display_board() {
        let player = Player::new(JsonKifu::new()).unwrap();
        let diagram = player.get_state().display_board();
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines[0], "後手の持駒：なし");
        assert_eq!(lines[3], "|v香v桂v銀v金v玉v金v銀v桂v香|一");
        assert_eq!(lines[11], "| 香 桂 銀 金 玉 金 銀 桂 香|九");
        assert_eq!(lines.last().copied(), Some("先手番"));
    }

    #[test]
    fn test_hand_counts_in_kanji() {
        let mut state = Player::new(JsonKifu::new()).unwrap().get_state();
        state.hands[0].insert(Kind::Pawn, 12);
        state.hands[0].insert(Kind::Bishop, 1);
        assert_eq!(hand_line(&state, Color::Black), "先手の持駒：角　歩十二");
    }
}
