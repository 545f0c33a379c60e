use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Tree,
    Water,
}

impl TileKind {
    pub const ALL: [TileKind; 3] = [TileKind::Grass, TileKind::Tree, TileKind::Water];

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'g' => Some(TileKind::Grass),
            't' => Some(TileKind::Tree),
            'w' => Some(TileKind::Water),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Tree => "tree",
            TileKind::Water => "water",
        }
    }
}

/// Source pixel origin of a tile inside its atlas image. The region is one
/// base tile square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubImage {
    pub sx: u32,
    pub sy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub sub_image: Option<SubImage>,
}

impl Tile {
    pub const fn plain(kind: TileKind) -> Self {
        Self {
            kind,
            sub_image: None,
        }
    }
}

/// Toroidal background grid, row-major. Every lookup through `tile_at_wrapped`
/// folds into range, so callers never index outside the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldMapError {
    #[error("world dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile glyph '{glyph}' at row {row}, column {column}")]
    UnknownGlyph {
        glyph: char,
        row: usize,
        column: usize,
    },
    #[error("sub-image entry targets ({x}, {y}) outside the {width}x{height} world")]
    SubImageOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl WorldMap {
    pub fn new(width: u32, height: u32, tiles: Vec<Tile>) -> Result<Self, WorldMapError> {
        if width == 0 || height == 0 {
            return Err(WorldMapError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(WorldMapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn filled(width: u32, height: u32, tile: Tile) -> Result<Self, WorldMapError> {
        Self::new(width, height, vec![tile; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wrap_x(&self, x: i64) -> u32 {
        x.rem_euclid(i64::from(self.width)) as u32
    }

    pub fn wrap_y(&self, y: i64) -> u32 {
        y.rem_euclid(i64::from(self.height)) as u32
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index_of(x, y).and_then(|index| self.tiles.get(index))
    }

    pub fn tile_at_wrapped(&self, x: i64, y: i64) -> &Tile {
        let index = self.wrap_y(y) as usize * self.width as usize + self.wrap_x(x) as usize;
        &self.tiles[index]
    }

    pub fn set_tile(&mut self, x: u32, y: u32, tile: Tile) -> bool {
        match self.index_of(x, y) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }
}

/// On-disk map description. Rows are strings of tile glyphs (`g` grass, `t`
/// tree, `w` water); atlas regions are attached per cell.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldMapFile {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<String>,
    #[serde(default)]
    pub sub_images: Vec<SubImageEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SubImageEntry {
    pub x: u32,
    pub y: u32,
    pub sx: u32,
    pub sy: u32,
}

impl WorldMapFile {
    pub fn into_world_map(self) -> Result<WorldMap, WorldMapError> {
        let expected_rows = self.height as usize;
        if self.rows.len() != expected_rows {
            return Err(WorldMapError::TileCountMismatch {
                expected: (self.width as usize).saturating_mul(expected_rows),
                actual: self.rows.iter().map(|row| row.chars().count()).sum(),
            });
        }

        // Grown per validated row; the declared width is untrusted.
        let mut tiles = Vec::new();
        for (row_index, row) in self.rows.iter().enumerate() {
            let row_len = row.chars().count();
            if row_len != self.width as usize {
                return Err(WorldMapError::RowLength {
                    row: row_index,
                    expected: self.width as usize,
                    actual: row_len,
                });
            }
            for (column, glyph) in row.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(WorldMapError::UnknownGlyph {
                    glyph,
                    row: row_index,
                    column,
                })?;
                tiles.push(Tile::plain(kind));
            }
        }

        let mut map = WorldMap::new(self.width, self.height, tiles)?;
        for entry in self.sub_images {
            let Some(tile) = map.tile_at(entry.x, entry.y).copied() else {
                return Err(WorldMapError::SubImageOutOfRange {
                    x: entry.x,
                    y: entry.y,
                    width: map.width,
                    height: map.height,
                });
            };
            map.set_tile(
                entry.x,
                entry.y,
                Tile {
                    kind: tile.kind,
                    sub_image: Some(SubImage {
                        sx: entry.sx,
                        sy: entry.sy,
                    }),
                },
            );
        }
        Ok(map)
    }
}
