use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PaletteError::BadColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| PaletteError::BadColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub name: String,
    pub color: Rgb,
}

impl ColorSample {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,
    #[error("palette contains `{0}` more than once")]
    DuplicateName(String),
    #[error("palette uses {0} for more than one name")]
    DuplicateColor(Rgb),
    #[error("`{0}` is not a #rrggbb color")]
    BadColor(String),
}

/// Fixed, ordered catalog of named colors. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    samples: Vec<ColorSample>,
}

const STANDARD: [(&str, Rgb); 14] = [
    ("Red", Rgb::new(0xff, 0x3b, 0x30)),
    ("Blue", Rgb::new(0x00, 0x7a, 0xff)),
    ("Green", Rgb::new(0x34, 0xc7, 0x59)),
    ("Yellow", Rgb::new(0xff, 0xcc, 0x00)),
    ("Orange", Rgb::new(0xff, 0x95, 0x00)),
    ("Purple", Rgb::new(0xaf, 0x52, 0xde)),
    ("Pink", Rgb::new(0xff, 0x2d, 0x55)),
    ("Brown", Rgb::new(0xa2, 0x84, 0x5e)),
    ("Gray", Rgb::new(0x8e, 0x8e, 0x93)),
    ("Black", Rgb::new(0x00, 0x00, 0x00)),
    ("White", Rgb::new(0xff, 0xff, 0xff)),
    ("Cyan", Rgb::new(0x32, 0xad, 0xe6)),
    ("Indigo", Rgb::new(0x58, 0x56, 0xd6)),
    ("Teal", Rgb::new(0x30, 0xb0, 0xc7)),
];

impl Palette {
    pub fn new(samples: Vec<ColorSample>) -> Result<Self, PaletteError> {
        if samples.is_empty() {
            return Err(PaletteError::Empty);
        }
        for (i, sample) in samples.iter().enumerate() {
            if samples[..i].iter().any(|s| s.name == sample.name) {
                return Err(PaletteError::DuplicateName(sample.name.clone()));
            }
            // Match rounds compare entries, so each color must be unique too.
            if samples[..i].iter().any(|s| s.color == sample.color) {
                return Err(PaletteError::DuplicateColor(sample.color));
            }
        }
        Ok(Self { samples })
    }

    /// The 14 stock colors.
    pub fn standard() -> Self {
        Self {
            samples: STANDARD
                .iter()
                .map(|&(name, color)| ColorSample::new(name, color))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColorSample> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[ColorSample] {
        &self.samples
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_palette_has_fourteen_unique_colors() {
        let palette = Palette::standard();
        assert_eq!(palette.len(), 14);
        assert_eq!(palette.get(0).map(|s| s.name.as_str()), Some("Red"));
        assert_eq!(palette.get(13).map(|s| s.name.as_str()), Some("Teal"));
        assert!(Palette::new(palette.samples().to_vec()).is_ok());
    }

    #[test]
    fn rejects_empty_and_duplicate_palettes() {
        assert_eq!(Palette::new(vec![]), Err(PaletteError::Empty));
        let red = ColorSample::new("Red", Rgb::new(255, 0, 0));
        assert_eq!(
            Palette::new(vec![red.clone(), red]),
            Err(PaletteError::DuplicateName("Red".to_string()))
        );
    }

    #[test]
    fn rejects_two_names_for_one_color() {
        let palette = Palette::new(vec![
            ColorSample::new("Red", Rgb::new(0xff, 0, 0)),
            ColorSample::new("Crimson", Rgb::new(0xff, 0, 0)),
        ]);
        assert_eq!(
            palette,
            Err(PaletteError::DuplicateColor(Rgb::new(0xff, 0, 0)))
        );
    }

    #[test]
    fn rgb_serializes_as_hex() {
        let sample = ColorSample::new("Teal", Rgb::new(0x30, 0xb0, 0xc7));
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r##"{"name":"Teal","color":"#30b0c7"}"##);
        let back: ColorSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
        assert!("#12345".parse::<Rgb>().is_err());
    }
}
