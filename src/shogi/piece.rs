use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Side to move. Black (sente) moves first in an even game.
///
/// Serialized as the JKF integers `0` (black) and `1` (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Color::Black),
            1 => Ok(Color::White),
            n => Err(de::Error::custom(format!("invalid color {}, expected 0 or 1", n))),
        }
    }
}

/// Piece kinds, serialized with their two-letter CSA codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "FU")]
    Pawn,
    #[serde(rename = "KY")]
    Lance,
    #[serde(rename = "KE")]
    Knight,
    #[serde(rename = "GI")]
    Silver,
    #[serde(rename = "KI")]
    Gold,
    #[serde(rename = "KA")]
    Bishop,
    #[serde(rename = "HI")]
    Rook,
    #[serde(rename = "OU")]
    King,
    #[serde(rename = "TO")]
    PromotedPawn,
    #[serde(rename = "NY")]
    PromotedLance,
    #[serde(rename = "NK")]
    PromotedKnight,
    #[serde(rename = "NG")]
    PromotedSilver,
    #[serde(rename = "UM")]
    Horse,
    #[serde(rename = "RY")]
    Dragon,
}

impl Kind {
    /// Kinds that can be held in hand, in JKF order.
    pub const HAND_KINDS: [Kind; 7] = [
        Kind::Pawn,
        Kind::Lance,
        Kind::Knight,
        Kind::Silver,
        Kind::Gold,
        Kind::Bishop,
        Kind::Rook,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Kind::Pawn => "FU",
            Kind::Lance => "KY",
            Kind::Knight => "KE",
            Kind::Silver => "GI",
            Kind::Gold => "KI",
            Kind::Bishop => "KA",
            Kind::Rook => "HI",
            Kind::King => "OU",
            Kind::PromotedPawn => "TO",
            Kind::PromotedLance => "NY",
            Kind::PromotedKnight => "NK",
            Kind::PromotedSilver => "NG",
            Kind::Horse => "UM",
            Kind::Dragon => "RY",
        }
    }

    pub fn from_code(code: &str) -> Option<Kind> {
        let kind = match code {
            "FU" => Kind::Pawn,
            "KY" => Kind::Lance,
            "KE" => Kind::Knight,
            "GI" => Kind::Silver,
            "KI" => Kind::Gold,
            "KA" => Kind::Bishop,
            "HI" => Kind::Rook,
            "OU" => Kind::King,
            "TO" => Kind::PromotedPawn,
            "NY" => Kind::PromotedLance,
            "NK" => Kind::PromotedKnight,
            "NG" => Kind::PromotedSilver,
            "UM" => Kind::Horse,
            "RY" => Kind::Dragon,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_promoted(self) -> bool {
        matches!(
            self,
            Kind::PromotedPawn
                | Kind::PromotedLance
                | Kind::PromotedKnight
                | Kind::PromotedSilver
                | Kind::Horse
                | Kind::Dragon
        )
    }

    /// Whether this kind has a promoted form. Already promoted kinds, gold and king do not.
    pub fn can_promote(self) -> bool {
        matches!(
            self,
            Kind::Pawn | Kind::Lance | Kind::Knight | Kind::Silver | Kind::Bishop | Kind::Rook
        )
    }

    pub fn promoted(self) -> Kind {
        match self {
            Kind::Pawn => Kind::PromotedPawn,
            Kind::Lance => Kind::PromotedLance,
            Kind::Knight => Kind::PromotedKnight,
            Kind::Silver => Kind::PromotedSilver,
            Kind::Bishop => Kind::Horse,
            Kind::Rook => Kind::Dragon,
            other => other,
        }
    }

    pub fn unpromoted(self) -> Kind {
        match self {
            Kind::PromotedPawn => Kind::Pawn,
            Kind::PromotedLance => Kind::Lance,
            Kind::PromotedKnight => Kind::Knight,
            Kind::PromotedSilver => Kind::Silver,
            Kind::Horse => Kind::Bishop,
            Kind::Dragon => Kind::Rook,
            other => other,
        }
    }

    pub fn is_hand_kind(self) -> bool {
        Kind::HAND_KINDS.contains(&self)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: Kind,
}

impl Piece {
    pub fn new(color: Color, kind: Kind) -> Self {
        Piece { color, kind }
    }
}

/// Board square in JKF coordinates: `x` is the file (1-9, right to left from
/// black's side), `y` the rank (1-9, top to bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    pub fn new(x: u8, y: u8) -> Self {
        Square { x, y }
    }

    pub fn is_on_board(self) -> bool {
        (1..=9).contains(&self.x) && (1..=9).contains(&self.y)
    }

    /// Ranks 1-3 for black, 7-9 for white.
    pub fn in_promotion_zone(self, color: Color) -> bool {
        match color {
            Color::Black => self.y <= 3,
            Color::White => self.y >= 7,
        }
    }

    pub(crate) fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if (1..=9).contains(&x) && (1..=9).contains(&y) {
            Some(Square::new(x as u8, y as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Color::White).unwrap(), "1");
        let color: Color = serde_json::from_str("0").unwrap();
        assert_eq!(color, Color::Black);
        assert!(serde_json::from_str::<Color>("2").is_err());
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(serde_json::to_string(&Kind::Dragon).unwrap(), "\"RY\"");
        assert_eq!(Kind::from_code("NG"), Some(Kind::PromotedSilver));
        assert_eq!(Kind::from_code("XX"), None);
        assert_eq!(Kind::Bishop.promoted(), Kind::Horse);
        assert_eq!(Kind::Horse.unpromoted(), Kind::Bishop);
        assert!(!Kind::Gold.can_promote());
        assert!(!Kind::Horse.can_promote());
    }

    #[test]
    fn test_promotion_zone() {
        assert!(Square::new(5, 3).in_promotion_zone(Color::Black));
        assert!(!Square::new(5, 4).in_promotion_zone(Color::Black));
        assert!(Square::new(5, 7).in_promotion_zone(Color::White));
        assert!(!Square::new(5, 6).in_promotion_zone(Color::White));
    }
}
