//! Floor tile palette offered by the map editor.

use serde::{Deserialize, Serialize};

/// Number of image variants every colour set provides.
pub const VARIANTS_PER_COLOR: usize = 4;

/// Tile families that can be painted onto a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Walkable floor.
    Floor,
}

/// Colour sets of the floor tile family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorColor {
    /// Plain stone.
    #[default]
    Normal,
    /// Red-tinted stone.
    Red,
    /// Green-tinted stone.
    Green,
}

impl FloorColor {
    /// Every colour set, in palette order.
    pub const ALL: [FloorColor; 3] = [FloorColor::Normal, FloorColor::Red, FloorColor::Green];
}

/// Palette entry picked up by the user before dropping it onto a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    /// Tile family to paint.
    pub tile: TileKind,
    /// Colour set the painted image is drawn from.
    pub color: FloorColor,
}

impl PaletteEntry {
    /// Creates a new palette entry.
    #[must_use]
    pub const fn new(tile: TileKind, color: FloorColor) -> Self {
        Self { tile, color }
    }
}

static FLOOR_NORMAL: [&str; VARIANTS_PER_COLOR] = [
    "Assets/objects/tiles/tile1.png",
    "Assets/objects/tiles/tile2.png",
    "Assets/objects/tiles/tile3.png",
    "Assets/objects/tiles/tile4.png",
];

static FLOOR_RED: [&str; VARIANTS_PER_COLOR] = [
    "Assets/objects/tiles_red/tile1.png",
    "Assets/objects/tiles_red/tile2.png",
    "Assets/objects/tiles_red/tile3.png",
    "Assets/objects/tiles_red/tile4.png",
];

static FLOOR_GREEN: [&str; VARIANTS_PER_COLOR] = [
    "Assets/objects/tiles_green/tile1.png",
    "Assets/objects/tiles_green/tile2.png",
    "Assets/objects/tiles_green/tile3.png",
    "Assets/objects/tiles_green/tile4.png",
];

/// Image variants available for the given palette entry.
#[must_use]
pub fn variants(entry: PaletteEntry) -> &'static [&'static str; VARIANTS_PER_COLOR] {
    match (entry.tile, entry.color) {
        (TileKind::Floor, FloorColor::Normal) => &FLOOR_NORMAL,
        (TileKind::Floor, FloorColor::Red) => &FLOOR_RED,
        (TileKind::Floor, FloorColor::Green) => &FLOOR_GREEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_colour_offers_distinct_images() {
        for color in FloorColor::ALL {
            let images = variants(PaletteEntry::new(TileKind::Floor, color));
            for (index, image) in images.iter().enumerate() {
                assert!(image.ends_with(&format!("tile{}.png", index + 1)));
            }
        }
        assert_ne!(
            variants(PaletteEntry::new(TileKind::Floor, FloorColor::Red))[0],
            variants(PaletteEntry::new(TileKind::Floor, FloorColor::Green))[0]
        );
    }
}
