use jkfplayer::error::ParseError;
use jkfplayer::format::{FormatRegistry, KifuFormat, KifuParser};
use jkfplayer::jkf::{JsonKifu, MoveFormat, MoveNode};
use jkfplayer::{Color, Kind, Player, Square};

// Format autodetection and pluggable parsers

/// Minimal CSA reader: one `+7776FU` style move per line
struct CsaMoves;

impl KifuParser for CsaMoves {
    fn format(&self) -> KifuFormat {
        KifuFormat::Csa
    }

    fn parse(&self, text: &str) -> Result<JsonKifu, ParseError> {
        let syntax = |message: &str| ParseError::Syntax {
            format: KifuFormat::Csa,
            message: message.to_string(),
        };
        if !text.ends_with('\n') {
            return Err(syntax("missing final newline"));
        }

        let mut moves = Vec::new();
        for line in text.lines().filter(|l| !l.is_empty()) {
            let digits: Vec<u8> = line
                .chars()
                .skip(1)
                .take(4)
                .map(|c| c.to_digit(10).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(|| syntax("expected four digits"))?;
            if digits.len() != 4 {
                return Err(syntax("expected four digits"));
            }
            let to = Square::new(digits[2], digits[3]);
            let node = if digits[0] == 0 {
                let kind = Kind::from_code(line.get(5..7).unwrap_or("")).ok_or_else(|| syntax("bad piece"))?;
                MoveFormat::drop(to, kind)
            } else {
                MoveFormat::board(Square::new(digits[0], digits[1]), to)
            };
            moves.push(MoveNode::from_move(node));
        }
        Ok(JsonKifu::from_moves(moves))
    }
}

#[test]
fn test_jkf_is_detected_first() {
    let registry = FormatRegistry::default().with_parser(CsaMoves);
    assert_eq!(registry.formats(), vec![KifuFormat::Jkf, KifuFormat::Csa]);

    let outcome = registry.parse(r#"{"header": {}, "moves": [{}]}"#).expect("valid JKF");
    assert_eq!(outcome.format, KifuFormat::Jkf);
    assert!(outcome.failed.is_empty());
}

#[test]
fn test_fallback_records_failed_attempts() {
    let registry = FormatRegistry::default().with_parser(CsaMoves);
    let outcome = registry.parse("+7776FU\n-3334FU").expect("CSA moves");

    assert_eq!(outcome.format, KifuFormat::Csa);
    assert_eq!(outcome.failed.len(), 1, "JKF was tried and failed");
    assert_eq!(outcome.failed[0].format, KifuFormat::Jkf);
    assert!(matches!(outcome.failed[0].error, ParseError::Json(_)));

    // text formats are normalized after parsing
    let second = outcome.kifu.moves[2].as_move().expect("ply 2 is a move");
    assert_eq!(second.color, Some(Color::White));
    assert_eq!(second.piece, Some(Kind::Pawn));

    let mut player = Player::new(outcome.kifu).unwrap();
    player.goto(2).unwrap();
    assert_eq!(player.get_readable_kifu(None).unwrap(), "☖３四歩");
}

#[test]
fn test_every_failure_is_reported() {
    let registry = FormatRegistry::default().with_parser(CsaMoves);
    match registry.parse("not a record") {
        Err(ParseError::AllFormatsFailed(attempts)) => {
            let formats: Vec<KifuFormat> = attempts.iter().map(|a| a.format).collect();
            assert_eq!(formats, vec![KifuFormat::Jkf, KifuFormat::Csa]);
        }
        other => panic!("expected every format to fail, got {:?}", other.map(|o| o.format)),
    }
}

#[test]
fn test_illegal_text_record_fails_normalization() {
    let registry = FormatRegistry::empty().with_parser(CsaMoves);
    let result = registry.parse_as(KifuFormat::Csa, "+7775FU\n");
    assert!(
        matches!(result, Err(ParseError::Syntax { format: KifuFormat::Csa, .. })),
        "pawn cannot advance two squares"
    );
}

#[test]
fn test_player_parse_rejects_garbage() {
    assert!(Player::parse("{\"moves\": 3}").is_err());
    assert!(Player::parse("").is_err());
}
