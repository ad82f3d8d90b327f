use crate::util::{FiniteF32, FiniteF32Error};

/// A straight (not premultiplied) RGBA color, each channel in `[0, 1]`.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Zeroable)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    pub const RED: Self = Self([
        FiniteF32::ONE,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    pub const GREEN: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ONE,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    pub const BLUE: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
        FiniteF32::ONE,
    ]);
    /// Create a color from `[0, 1]` channels.
    ///
    /// Channels outside of that range are saturated, non-finite channels are an error.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        for channel in [r, g, b, a] {
            FiniteF32::new(channel)?;
        }
        Ok(Self([r, g, b, a].map(FiniteF32::saturating_unit)))
    }
    pub fn from_array([r, g, b, a]: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Self::new(r, g, b, a)
    }
    #[must_use]
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self([r, g, b, a].map(|channel| FiniteF32::saturating_unit(f32::from(channel) / 255.0)))
    }
    /// Unpack a `0xAARRGGBB` value, the layout most UI toolkits hand out.
    #[must_use]
    pub fn from_argb32(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_rgba8([r, g, b, a])
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    /// Quantize to 8 bits per channel, rounding to nearest.
    #[must_use]
    // Channels are in [0, 1], cast can't truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.0.map(|channel| (channel.get() * 255.0).round() as u8)
    }
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no padding.
unsafe impl bytemuck::NoUninit for Color {}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color({self})")
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error(transparent)]
    Digits(#[from] std::num::ParseIntError),
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;
    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim_ascii()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        // Reject non-ascii up front, so the byte slicing below is on char boundaries.
        if !digits.is_ascii() {
            return Err(ColorParseError::BadLength(digits.chars().count()));
        }
        let byte = |idx: usize| u8::from_str_radix(&digits[idx * 2..idx * 2 + 2], 16);
        match digits.len() {
            6 => Ok(Self::from_rgba8([byte(0)?, byte(1)?, byte(2)?, 255])),
            8 => Ok(Self::from_rgba8([byte(0)?, byte(1)?, byte(2)?, byte(3)?])),
            len => Err(ColorParseError::BadLength(len)),
        }
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};
    #[test]
    fn argb_unpack() {
        // Orange, as the UI toolkit packs it.
        let orange = Color::from_argb32(0xFFFF_A500);
        assert_eq!(orange.to_rgba8(), [0xFF, 0xA5, 0x00, 0xFF]);
        assert_eq!(Color::from_argb32(0xFFFF_0000), Color::RED);
    }
    #[test]
    fn new_saturates() {
        let color = Color::new(2.0, -1.0, 0.5, 1.0).unwrap();
        assert_eq!(color.as_array(), [1.0, 0.0, 0.5, 1.0]);
        assert!(Color::new(f32::NAN, 0.0, 0.0, 1.0).is_err());
    }
    #[test]
    fn parse_hex() {
        assert_eq!("#FF0000".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#0000FFFF".parse::<Color>(), Ok(Color::BLUE));
        assert_eq!(
            "FF0000".parse::<Color>(),
            Err(ColorParseError::MissingHash)
        );
        assert_eq!(
            "#FF00".parse::<Color>(),
            Err(ColorParseError::BadLength(4))
        );
        assert!(matches!(
            "#GG0000".parse::<Color>(),
            Err(ColorParseError::Digits(_))
        ));
    }
    #[test]
    fn display() {
        assert_eq!(Color::BLACK.to_string(), "#000000FF");
        assert_eq!(format!("{:?}", Color::WHITE), "Color(#FFFFFFFF)");
    }
}
