//! Notation parsers and format autodetection
//!
//! Only the JSON Kifu Format is parsed in this crate. KIF, KI2 and CSA
//! parsers plug in through [`KifuParser`] and are tried in the fixed order
//! JKF, KIF, KI2, CSA.

pub mod jkf;

use std::fmt;

use log::{debug, info};

use crate::error::{ParseAttempt, ParseError};
use crate::jkf::{JsonKifu, MinimalNormalizer, Normalizer};

pub use self::jkf::JkfParser;

/// Supported notations. Variant order is the autodetection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KifuFormat {
    Jkf,
    Kif,
    Ki2,
    Csa,
}

impl KifuFormat {
    /// Whether the format is line-oriented text that must end with a newline
    pub fn is_line_based(self) -> bool {
        !matches!(self, KifuFormat::Jkf)
    }
}

impl fmt::Display for KifuFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KifuFormat::Jkf => "JKF",
            KifuFormat::Kif => "KIF",
            KifuFormat::Ki2 => "KI2",
            KifuFormat::Csa => "CSA",
        };
        write!(f, "{}", name)
    }
}

/// Turns the text of one notation into a raw record
pub trait KifuParser {
    fn format(&self) -> KifuFormat;

    fn parse(&self, text: &str) -> Result<JsonKifu, ParseError>;
}

/// A successfully parsed record and the formats that failed before it
#[derive(Debug)]
pub struct ParseOutcome {
    pub format: KifuFormat,
    pub kifu: JsonKifu,
    pub failed: Vec<ParseAttempt>,
}

/// Registered parsers plus the normalizer applied to text formats
pub struct FormatRegistry {
    parsers: Vec<Box<dyn KifuParser>>,
    normalizer: Box<dyn Normalizer>,
}

impl FormatRegistry {
    /// Registry with no parsers at all
    pub fn empty() -> Self {
        FormatRegistry {
            parsers: Vec::new(),
            normalizer: Box::new(MinimalNormalizer),
        }
    }

    /// Add a parser, replacing any parser already registered for its format
    pub fn with_parser<P: KifuParser + 'static>(mut self, parser: P) -> Self {
        let format = parser.format();
        self.parsers.retain(|p| p.format() != format);
        self.parsers.push(Box::new(parser));
        self.parsers.sort_by_key(|p| p.format());
        self
    }

    pub fn with_normalizer<N: Normalizer + 'static>(mut self, normalizer: N) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Formats that can be parsed, in autodetection order
    pub fn formats(&self) -> Vec<KifuFormat> {
        self.parsers.iter().map(|p| p.format()).collect()
    }

    /// Parse `text` as one specific format
    pub fn parse_as(&self, format: KifuFormat, text: &str) -> Result<JsonKifu, ParseError> {
        let parser = self
            .parsers
            .iter()
            .find(|p| p.format() == format)
            .ok_or(ParseError::UnsupportedFormat(format))?;

        if !format.is_line_based() {
            return parser.parse(text);
        }

        let mut kifu = parser.parse(&add_last_newline(text))?;
        self.normalizer
            .normalize(format, &mut kifu)
            .map_err(|e| ParseError::Syntax { format, message: e.to_string() })?;
        Ok(kifu)
    }

    /// Try every registered format in priority order until one succeeds
    pub fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError> {
        let mut failed = Vec::new();

        for parser in &self.parsers {
            let format = parser.format();
            match self.parse_as(format, text) {
                Ok(kifu) => {
                    info!("parsed record as {} after {} failed attempts", format, failed.len());
                    return Ok(ParseOutcome { format, kifu, failed });
                }
                Err(error) => {
                    debug!("failed to parse as {}: {}", format, error);
                    failed.push(ParseAttempt { format, error });
                }
            }
        }

        Err(ParseError::AllFormatsFailed(failed))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry::empty().with_parser(JkfParser)
    }
}

/// Line-based parsers expect the text to end with a newline
pub fn add_last_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_last_newline() {
        assert_eq!(add_last_newline("a"), "a\n");
        assert_eq!(add_last_newline("a\n"), "a\n");
    }

    #[test]
    fn test_default_registry_knows_only_jkf() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.formats(), vec![KifuFormat::Jkf]);
        assert!(matches!(
            registry.parse_as(KifuFormat::Csa, "PI\n+\n"),
            Err(ParseError::UnsupportedFormat(KifuFormat::Csa))
        ));
    }
}
