use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A 24-bit RGB colour, written as `#rrggbb` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RgbHex(u32);

impl RgbHex {
    pub const MAX: u32 = 0xFF_FFFF;

    pub fn new(value: u32) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Keeps the low 24 bits of `value`.
    pub fn from_bits_truncate(value: u32) -> Self {
        Self(value & Self::MAX)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RgbHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<RgbHex> for String {
    fn from(value: RgbHex) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for RgbHex {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| format!("colour '{value}' must start with '#'"))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("colour '{value}' must have 6 hex digits after '#'"));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| format!("colour '{value}' is not valid hex"))
    }
}

/// One spawned circle. Positions are percentages of the viewport, size is in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: u8,
    pub y: u8,
    pub size: u8,
    pub color: RgbHex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRange {
    pub min: i64,
    pub max: i64,
}

impl GuessRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Distance from `min` to `max`. Unsigned so the full `i64` span fits.
    pub fn width(&self) -> u64 {
        self.max.abs_diff(self.min)
    }
}

impl Default for GuessRange {
    fn default() -> Self {
        Self { min: 1, max: 100 }
    }
}

impl fmt::Display for GuessRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    InRound,
    Won,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Higher,
    Lower,
    Won { attempts: u32 },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Higher => f.write_str("Higher"),
            Feedback::Lower => f.write_str("Lower"),
            Feedback::Won { attempts } => {
                write!(f, "Well done! Number found in {attempts} attempts!")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Hint {
    Parity { even: bool },
    DivisibleByThree { divisible: bool },
    Window { low: i64, high: i64 },
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Parity { even: true } => f.write_str("The number is even."),
            Hint::Parity { even: false } => f.write_str("The number is odd."),
            Hint::DivisibleByThree { divisible: true } => {
                f.write_str("The number is divisible by 3.")
            }
            Hint::DivisibleByThree { divisible: false } => {
                f.write_str("The number is not divisible by 3.")
            }
            Hint::Window { low, high } => write!(f, "The number is between {low} and {high}."),
        }
    }
}
