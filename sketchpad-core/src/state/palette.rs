use crate::color::Color;

/// The colors offered by a default [`Palette`], in display order.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Gray,
    LightGray,
    DarkGray,
    Orange,
    Pink,
    Purple,
    Violet,
    Brown,
    Lime,
    Navy,
}
impl NamedColor {
    /// Where this color sits in [`Palette::default`]. Colors are listed in declaration order.
    ///
    /// Prefer this over [`Palette::index_of`], as some names share a color.
    #[must_use]
    pub fn default_index(self) -> PaletteIndex {
        PaletteIndex(self as usize)
    }
    #[must_use]
    pub fn color(self) -> Color {
        Color::from_argb32(self.argb())
    }
    /// Packed `0xAARRGGBB`.
    #[must_use]
    pub const fn argb(self) -> u32 {
        match self {
            Self::Black => 0xFF00_0000,
            Self::White => 0xFFFF_FFFF,
            Self::Red => 0xFFFF_0000,
            // Full-intensity green, same as `Lime`. Both are kept so the palette layout is familiar.
            Self::Green | Self::Lime => 0xFF00_FF00,
            Self::Blue => 0xFF00_00FF,
            Self::Yellow => 0xFFFF_FF00,
            Self::Cyan => 0xFF00_FFFF,
            Self::Magenta => 0xFFFF_00FF,
            Self::Gray => 0xFF88_8888,
            Self::LightGray => 0xFFCC_CCCC,
            Self::DarkGray => 0xFF44_4444,
            Self::Orange => 0xFFFF_A500,
            Self::Pink => 0xFFFF_C0CB,
            Self::Purple => 0xFF80_0080,
            Self::Violet => 0xFF8A_2BE2,
            Self::Brown => 0xFFA5_2A2A,
            Self::Navy => 0xFF00_0080,
        }
    }
}
impl From<NamedColor> for Color {
    fn from(value: NamedColor) -> Self {
        value.color()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PaletteIndex(pub usize);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette has no entry {0:?}")]
    UnknownIndex(PaletteIndex),
    #[error("palette has no colors")]
    Empty,
}

/// The colors a user may pick from, and which one is picked.
///
/// Presentation is somebody else's problem. This only tracks the selection the palette collaborator
/// reports.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
    /// Invariant: in-bounds of `colors`.
    selected: PaletteIndex,
}
impl Default for Palette {
    fn default() -> Self {
        // Unwrap ok - there are named colors, and black is the first.
        Self::new(<NamedColor as strum::IntoEnumIterator>::iter().map(NamedColor::color)).unwrap()
    }
}
impl Palette {
    /// Make a palette of the given colors, with the first selected.
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Result<Self, PaletteError> {
        let colors: Vec<_> = colors.into_iter().collect();
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            colors,
            selected: PaletteIndex(0),
        })
    }
    /// Add a new color, returning its index.
    pub fn push(&mut self, color: Color) -> PaletteIndex {
        self.colors.push(color);
        PaletteIndex(self.colors.len() - 1)
    }
    #[must_use]
    pub fn get(&self, idx: PaletteIndex) -> Option<Color> {
        self.colors.get(idx.0).copied()
    }
    /// Find the first entry of the given color.
    #[must_use]
    pub fn index_of(&self, color: Color) -> Option<PaletteIndex> {
        self.colors
            .iter()
            .position(|&entry| entry == color)
            .map(PaletteIndex)
    }
    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, Color)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .map(|(idx, &color)| (PaletteIndex(idx), color))
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
    /// Pick an entry, returning its color.
    pub fn select(&mut self, idx: PaletteIndex) -> Result<Color, PaletteError> {
        let color = self.get(idx).ok_or(PaletteError::UnknownIndex(idx))?;
        self.selected = idx;
        Ok(color)
    }
    #[must_use]
    pub fn selected_index(&self) -> PaletteIndex {
        self.selected
    }
    #[must_use]
    pub fn selected(&self) -> Color {
        // Invariant upheld by `new` and `select`, entries are never removed.
        self.colors[self.selected.0]
    }
}
