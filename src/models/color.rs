//! Color identity model.
//!
//! Color identity is a classification key: two identities are related only
//! by exact set equality, never by subset or overlap. A two-color commander
//! does not belong to either of its mono-color bins.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the five mana colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// All colors in canonical WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Single-letter wire code.
    pub fn code(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// Parse a single-letter wire code (case-insensitive).
    pub fn from_code(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Color::White => 1 << 0,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
        }
    }
}

/// The exact set of colors a commander (plus partner) or card is restricted to.
///
/// The empty identity is colorless. The wire code `C` denotes it explicitly;
/// it is not a sixth color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorIdentity(u8);

impl ColorIdentity {
    /// The colorless identity.
    pub const COLORLESS: ColorIdentity = ColorIdentity(0);

    /// Build an identity from a slice of colors.
    pub fn of(colors: &[Color]) -> Self {
        let mut mask = 0u8;
        for c in colors {
            mask |= c.bit();
        }
        ColorIdentity(mask)
    }

    /// Copy of this identity with one more color.
    pub fn with(self, color: Color) -> Self {
        ColorIdentity(self.0 | color.bit())
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn is_colorless(&self) -> bool {
        self.0 == 0
    }

    /// Number of colors in the identity.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.is_colorless()
    }

    /// Colors in canonical WUBRG order.
    pub fn colors(&self) -> Vec<Color> {
        Color::ALL
            .iter()
            .copied()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Parse wire codes (`["W", "U"]`). `C` alone means colorless.
    /// Returns `None` on an unrecognized code.
    pub fn from_codes<'a, I>(codes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut identity = ColorIdentity::COLORLESS;
        for code in codes {
            let code = code.trim();
            if code.eq_ignore_ascii_case("C") {
                continue;
            }
            let mut chars = code.chars();
            let (c, rest) = (chars.next()?, chars.next());
            if rest.is_some() {
                return None;
            }
            identity = identity.with(Color::from_code(c)?);
        }
        Some(identity)
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            return write!(f, "C");
        }
        for c in self.colors() {
            write!(f, "{}", c.code())?;
        }
        Ok(())
    }
}

impl fmt::Debug for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorIdentity({})", self)
    }
}

impl FromStr for ColorIdentity {
    type Err = String;

    /// Parse a compact code string (`"WU"`, `"c"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("C") {
            return Ok(ColorIdentity::COLORLESS);
        }
        let mut identity = ColorIdentity::COLORLESS;
        for c in s.chars() {
            identity = identity
                .with(Color::from_code(c).ok_or_else(|| format!("unknown color code: {c}"))?);
        }
        Ok(identity)
    }
}

impl Serialize for ColorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let colors = self.colors();
        let mut seq = serializer.serialize_seq(Some(colors.len()))?;
        for c in colors {
            seq.serialize_element(&c.code().to_string())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ColorIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodesVisitor;

        impl<'de> Visitor<'de> for CodesVisitor {
            type Value = ColorIdentity;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sequence of color codes like [\"W\", \"U\"]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut codes: Vec<String> = Vec::new();
                while let Some(code) = seq.next_element::<String>()? {
                    codes.push(code);
                }
                ColorIdentity::from_codes(codes.iter().map(String::as_str))
                    .ok_or_else(|| serde::de::Error::custom("unknown color code"))
            }
        }

        deserializer.deserialize_seq(CodesVisitor)
    }
}
