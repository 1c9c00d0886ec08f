use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MoveFormat, TimeFormat};

/// What a node records. Exactly one payload is ever active; the ply-0
/// placeholder carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Root,
    Move(MoveFormat),
    Special(Special),
}

/// One ply of a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMoveNode", into = "RawMoveNode")]
pub struct MoveNode {
    pub content: NodeContent,
    pub comments: Vec<String>,
    /// Alternative branches starting at this node's ply
    pub forks: Vec<Vec<MoveNode>>,
    pub time: Option<TimeFormat>,
}

impl MoveNode {
    pub fn root() -> Self {
        MoveNode::with_content(NodeContent::Root)
    }

    pub fn from_move(mv: MoveFormat) -> Self {
        MoveNode::with_content(NodeContent::Move(mv))
    }

    pub fn from_special(special: Special) -> Self {
        MoveNode::with_content(NodeContent::Special(special))
    }

    fn with_content(content: NodeContent) -> Self {
        MoveNode {
            content,
            comments: Vec::new(),
            forks: Vec::new(),
            time: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    pub fn as_move(&self) -> Option<&MoveFormat> {
        match &self.content {
            NodeContent::Move(mv) => Some(mv),
            _ => None,
        }
    }

    pub(crate) fn as_move_mut(&mut self) -> Option<&mut MoveFormat> {
        match &mut self.content {
            NodeContent::Move(mv) => Some(mv),
            _ => None,
        }
    }

    pub fn special(&self) -> Option<&Special> {
        match &self.content {
            NodeContent::Special(special) => Some(special),
            _ => None,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self.content, NodeContent::Special(_))
    }
}

/// Terminal outcomes, stored as their CSA-derived tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Special {
    Resign,
    Interrupt,
    Repetition,
    TimeUp,
    IllegalMove,
    BlackIllegalAction,
    WhiteIllegalAction,
    Impasse,
    DeclareWin,
    DeclareDraw,
    Retract,
    Checkmate,
    NoCheckmate,
    Error,
    /// Any tag without a dedicated variant, kept verbatim
    Other(String),
}

impl Special {
    pub fn tag(&self) -> &str {
        match self {
            Special::Resign => "TORYO",
            Special::Interrupt => "CHUDAN",
            Special::Repetition => "SENNICHITE",
            Special::TimeUp => "TIME_UP",
            Special::IllegalMove => "ILLEGAL_MOVE",
            Special::BlackIllegalAction => "+ILLEGAL_ACTION",
            Special::WhiteIllegalAction => "-ILLEGAL_ACTION",
            Special::Impasse => "JISHOGI",
            Special::DeclareWin => "KACHI",
            Special::DeclareDraw => "HIKIWAKE",
            Special::Retract => "MATTA",
            Special::Checkmate => "TSUMI",
            Special::NoCheckmate => "FUZUMI",
            Special::Error => "ERROR",
            Special::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Special {
        match tag {
            "TORYO" => Special::Resign,
            "CHUDAN" => Special::Interrupt,
            "SENNICHITE" => Special::Repetition,
            "TIME_UP" => Special::TimeUp,
            "ILLEGAL_MOVE" => Special::IllegalMove,
            "+ILLEGAL_ACTION" => Special::BlackIllegalAction,
            "-ILLEGAL_ACTION" => Special::WhiteIllegalAction,
            "JISHOGI" => Special::Impasse,
            "KACHI" => Special::DeclareWin,
            "HIKIWAKE" => Special::DeclareDraw,
            "MATTA" => Special::Retract,
            "TSUMI" => Special::Checkmate,
            "FUZUMI" => Special::NoCheckmate,
            "ERROR" => Special::Error,
            other => Special::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Flat persisted shape of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawMoveNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r#move: Option<MoveFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<TimeFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    special: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forks: Option<Vec<Vec<MoveNode>>>,
}

impl TryFrom<RawMoveNode> for MoveNode {
    type Error = String;

    fn try_from(raw: RawMoveNode) -> Result<Self, Self::Error> {
        let content = match (raw.r#move, raw.special) {
            (Some(_), Some(special)) => {
                return Err(format!("node carries both a move and special '{}'", special))
            }
            (Some(mv), None) => NodeContent::Move(mv),
            (None, Some(special)) => NodeContent::Special(Special::from_tag(&special)),
            (None, None) => NodeContent::Root,
        };
        Ok(MoveNode {
            content,
            comments: raw.comments.unwrap_or_default(),
            forks: raw.forks.unwrap_or_default(),
            time: raw.time,
        })
    }
}

impl From<MoveNode> for RawMoveNode {
    fn from(node: MoveNode) -> Self {
        let (r#move, special) = match node.content {
            NodeContent::Root => (None, None),
            NodeContent::Move(mv) => (Some(mv), None),
            NodeContent::Special(special) => (None, Some(special.tag().to_string())),
        };
        RawMoveNode {
            comments: Some(node.comments).filter(|c| !c.is_empty()),
            r#move,
            time: node.time,
            special,
            forks: Some(node.forks).filter(|f| !f.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shogi::Square;

    #[test]
    fn test_move_and_special_together_is_rejected() {
        let text = r#"{"move": {"to": {"x": 1, "y": 1}}, "special": "TORYO"}"#;
        let result: Result<MoveNode, _> = serde_json::from_str(text);
        assert!(result.is_err(), "a node must not carry both payloads");
    }

    #[test]
    fn test_empty_fields_are_not_written() {
        let node = MoveNode::from_move(MoveFormat::board(Square::new(7, 7), Square::new(7, 6)));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"move":{"from":{"x":7,"y":7},"to":{"x":7,"y":6}}}"#);
        assert_eq!(serde_json::to_string(&MoveNode::root()).unwrap(), "{}");
    }

    #[test]
    fn test_unknown_special_is_kept_verbatim() {
        let node: MoveNode = serde_json::from_str(r#"{"special": "MADE_UP"}"#).unwrap();
        assert_eq!(node.special(), Some(&Special::Other("MADE_UP".to_string())));
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"special":"MADE_UP"}"#);
    }

    #[test]
    fn test_special_tags() {
        assert_eq!(Special::from_tag("+ILLEGAL_ACTION"), Special::BlackIllegalAction);
        assert_eq!(Special::Impasse.tag(), "JISHOGI");
    }
}
