use std::fmt;

use crate::format::KifuFormat;
use crate::jkf::normalizer::NormalizeError;
use crate::shogi::ShogiError;

/// Failures of player operations
#[derive(Debug)]
pub enum PlayerError {
    /// The rules engine rejected a move
    IllegalMove(ShogiError),
    /// No node at this ply on the active line, or the path stack no longer
    /// matches the record
    InvalidPly(usize),
    /// A move was input after a terminal node at this ply
    TerminalExtension(usize),
    /// `goto` gave up after `limit` steps
    IterationOverflow { target: usize, limit: usize },
    /// The record's initial position cannot be set up
    Setup(ShogiError),
    /// The first node of the main line carries a move or terminal
    MissingRoot,
    /// Derived fields could not be repaired after an edit
    Normalize(NormalizeError),
    Parse(ParseError),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::IllegalMove(e) => write!(f, "illegal move: {}", e),
            PlayerError::InvalidPly(ply) => write!(f, "invalid ply {}", ply),
            PlayerError::TerminalExtension(ply) => {
                write!(f, "cannot add a move after the terminal node at ply {}", ply)
            }
            PlayerError::IterationOverflow { target, limit } => write!(
                f,
                "gave up moving to ply {} after {} steps; the record may be malformed",
                target, limit
            ),
            PlayerError::Setup(e) => write!(f, "cannot set up initial position: {}", e),
            PlayerError::MissingRoot => write!(f, "the first node of the record must not hold a move"),
            PlayerError::Normalize(e) => write!(f, "cannot normalize record: {}", e),
            PlayerError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlayerError::IllegalMove(e) | PlayerError::Setup(e) => Some(e),
            PlayerError::Normalize(e) => Some(e),
            PlayerError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for PlayerError {
    fn from(e: ParseError) -> Self {
        PlayerError::Parse(e)
    }
}

/// One failed format during autodetection
#[derive(Debug)]
pub struct ParseAttempt {
    pub format: KifuFormat,
    pub error: ParseError,
}

/// Failures turning text into a record
#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    Syntax { format: KifuFormat, message: String },
    UnsupportedFormat(KifuFormat),
    AllFormatsFailed(Vec<ParseAttempt>),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Json(e) => write!(f, "JKF parse error: {}", e),
            ParseError::Syntax { format, message } => write!(f, "{} parse error: {}", format, message),
            ParseError::UnsupportedFormat(format) => write!(f, "no parser registered for {}", format),
            ParseError::AllFormatsFailed(attempts) => {
                if attempts.is_empty() {
                    return write!(f, "no formats to try");
                }
                let tried: Vec<String> = attempts.iter().map(|a| a.format.to_string()).collect();
                write!(f, "failed to parse as any of {}", tried.join(", "))?;
                for attempt in attempts {
                    write!(f, "; {}", attempt.error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e)
    }
}
