//! Character-grid map used by the demo and the tests.

use crate::ecs::Position;
use crate::services::{Footprint, MapQuery};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
}

/// Rectangular tile grid. Anything outside the grid counts as wall.
#[derive(Debug, Clone)]
pub struct GridMap {
    tiles: Vec<Vec<Tile>>,
    tile_size: f32,
}

impl GridMap {
    /// `#` is a wall, every other character is floor.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Self {
        let tiles = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .chars()
                    .map(|c| if c == '#' { Tile::Wall } else { Tile::Floor })
                    .collect()
            })
            .collect();
        Self { tiles, tile_size }
    }

    /// Open floor of `width` × `height` tiles ringed by walls.
    pub fn walled_room(width: usize, height: usize, tile_size: f32) -> Self {
        let rows: Vec<String> = (0..height)
            .map(|r| {
                (0..width)
                    .map(|c| {
                        if r == 0 || c == 0 || r + 1 == height || c + 1 == width {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows.as_slice(), tile_size)
    }

    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, col: i64, row: i64) -> Tile {
        if col < 0 || row < 0 {
            return Tile::Wall;
        }
        self.tiles
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    pub fn set_tile(&mut self, col: usize, row: usize, tile: Tile) {
        if let Some(slot) = self.tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = tile;
        }
    }

    /// Range of tile indices touched by the span [start, start + len).
    fn span(&self, start: f32, len: f32) -> (i64, i64) {
        let first = (start / self.tile_size).floor() as i64;
        let last = ((start + len) / self.tile_size).ceil() as i64 - 1;
        (first, last.max(first))
    }

    fn fits(&self, col: usize, row: usize, footprint: Footprint) -> bool {
        (0..footprint.height as usize).all(|dr| {
            (0..footprint.width as usize)
                .all(|dc| self.tile((col + dc) as i64, (row + dr) as i64) == Tile::Floor)
        })
    }
}

impl MapQuery for GridMap {
    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn is_wall_at(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let (c0, c1) = self.span(x, width);
        let (r0, r1) = self.span(y, height);
        (r0..=r1).any(|row| (c0..=c1).any(|col| self.tile(col, row) == Tile::Wall))
    }

    fn random_floor_position(&self, footprint: Footprint, rng: &mut StdRng) -> Option<Position> {
        let candidates: Vec<(usize, usize)> = (0..self.height())
            .flat_map(|row| (0..self.width()).map(move |col| (col, row)))
            .filter(|&(col, row)| self.fits(col, row, footprint))
            .collect();
        candidates.choose(rng).map(|&(col, row)| {
            Position::new(col as f32 * self.tile_size, row as f32 * self.tile_size)
        })
    }
}
