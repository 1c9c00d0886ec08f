use log::debug;

use super::{KifuFormat, KifuParser};
use crate::error::ParseError;
use crate::jkf::{JsonKifu, MoveNode, NodeContent};

/// Reads JSON Kifu Format text. The record is taken as is, without normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct JkfParser;

impl KifuParser for JkfParser {
    fn format(&self) -> KifuFormat {
        KifuFormat::Jkf
    }

    fn parse(&self, text: &str) -> Result<JsonKifu, ParseError> {
        let mut kifu: JsonKifu = serde_json::from_str(text)?;
        debug!("parsed JKF record with {} main line nodes", kifu.moves.len());

        // every line of play needs its ply-0 placeholder
        match kifu.moves.first() {
            None => kifu.moves.push(MoveNode::root()),
            Some(first) if first.content != NodeContent::Root => {
                return Err(ParseError::Syntax {
                    format: KifuFormat::Jkf,
                    message: "first node of the main line must not carry a move".to_string(),
                })
            }
            Some(_) => {}
        }
        Ok(kifu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_move_list_gets_root() {
        let kifu = JkfParser.parse(r#"{"header": {}, "moves": []}"#).unwrap();
        assert_eq!(kifu.moves.len(), 1);
        assert_eq!(kifu.moves[0].content, NodeContent::Root);
    }

    #[test]
    fn test_main_line_must_start_with_root() {
        let text = r#"{"moves": [{"special": "TORYO"}]}"#;
        assert!(matches!(JkfParser.parse(text), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(JkfParser.parse("not json"), Err(ParseError::Json(_))));
    }
}
