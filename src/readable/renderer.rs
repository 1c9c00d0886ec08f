//! Japanese move notation, e.g. `☗７六歩`, `☖同　銀`, `☗５八金右`

use crate::jkf::{MoveFormat, MoveNode, NodeContent, Special};
use crate::shogi::{Color, Kind, Square};

pub const START_LABEL: &str = "開始局面";

const ZEN_DIGITS: &str = "０１２３４５６７８９";
const KAN_DIGITS: &str = "〇一二三四五六七八九";

/// Full-width digit for `0..=9`
pub fn num_to_zen(n: u8) -> char {
    ZEN_DIGITS.chars().nth(n as usize).unwrap_or('？')
}

/// Kanji numeral for `0..=9`
pub fn num_to_kan(n: u8) -> char {
    KAN_DIGITS.chars().nth(n as usize).unwrap_or('？')
}

pub fn kind_to_kan(kind: Kind) -> &'static str {
    match kind {
        Kind::Pawn => "歩",
        Kind::Lance => "香",
        Kind::Knight => "桂",
        Kind::Silver => "銀",
        Kind::Gold => "金",
        Kind::Bishop => "角",
        Kind::Rook => "飛",
        Kind::King => "玉",
        Kind::PromotedPawn => "と",
        Kind::PromotedLance => "成香",
        Kind::PromotedKnight => "成桂",
        Kind::PromotedSilver => "成銀",
        Kind::Horse => "馬",
        Kind::Dragon => "龍",
    }
}

/// Glyph for one disambiguation letter
pub fn relative_to_kan(letter: char) -> Option<&'static str> {
    match letter {
        'L' => Some("左"),
        'C' => Some("直"),
        'R' => Some("右"),
        'U' => Some("上"),
        'M' => Some("寄"),
        'D' => Some("引"),
        'H' => Some("打"),
        _ => None,
    }
}

pub fn special_to_kan(special: &Special) -> &str {
    match special {
        Special::Resign => "投了",
        Special::Interrupt => "中断",
        Special::Repetition => "千日手",
        Special::TimeUp => "時間切れ",
        Special::IllegalMove => "反則負け",
        Special::BlackIllegalAction => "後手反則負け",
        Special::WhiteIllegalAction => "先手反則負け",
        Special::Impasse => "持将棋",
        Special::DeclareWin => "勝ち宣言",
        Special::DeclareDraw => "引き分け宣言",
        Special::Retract => "待った",
        Special::Checkmate => "詰",
        Special::NoCheckmate => "不詰",
        Special::Error => "エラー",
        Special::Other(tag) => tag,
    }
}

/// Render one node. `previous_to` is the destination of the move before it,
/// used to write `同` for recaptures.
pub fn move_to_readable_kifu(node: &MoveNode, previous_to: Option<Square>) -> String {
    match &node.content {
        NodeContent::Root => START_LABEL.to_string(),
        NodeContent::Special(special) => special_to_kan(special).to_string(),
        NodeContent::Move(mv) => render_move(mv, previous_to),
    }
}

fn render_move(mv: &MoveFormat, previous_to: Option<Square>) -> String {
    let mut out = String::new();
    match mv.color {
        Some(Color::Black) => out.push('☗'),
        Some(Color::White) => out.push('☖'),
        None => {}
    }

    let same = match previous_to {
        Some(previous) => previous == mv.to,
        None => mv.same == Some(true),
    };
    if same {
        out.push_str("同　");
    } else {
        out.push(num_to_zen(mv.to.x));
        out.push(num_to_kan(mv.to.y));
    }

    if let Some(kind) = mv.piece {
        out.push_str(kind_to_kan(kind));
    }
    if let Some(relative) = &mv.relative {
        out.extend(relative.chars().filter_map(relative_to_kan));
    }
    match mv.promote {
        Some(true) => out.push('成'),
        Some(false) => out.push_str("不成"),
        None => {}
    }
    out
}
