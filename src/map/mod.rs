#![allow(dead_code)]

pub mod region;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

use crate::error::MapError;

pub use region::{VisibleRegion, display_to_map};

/// Tile walkability for a rectangular map.
///
/// Flags are stored for `0..=width` by `0..=height`: the extra column and row
/// past the logical edge keep inclusive region scans in bounds and always
/// report blocked.
#[derive(Clone, Debug)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    blocked: Vec<bool>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = Self::unbordered(width, height);
        map.block_borders();
        map
    }

    /// A map with only the overflow row and column blocked.
    pub fn unbordered(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let size = ((width + 1) * (height + 1)) as usize;
        let mut map = Self {
            width,
            height,
            blocked: vec![false; size],
        };
        for y in 0..=height {
            let idx = map.index(width, y);
            map.blocked[idx] = true;
        }
        for x in 0..=width {
            let idx = map.index(x, height);
            map.blocked[idx] = true;
        }
        map
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * (self.width + 1) + x) as usize
    }

    fn checked_idx(&self, point: Point) -> Result<usize, MapError> {
        if self.in_storage(point) {
            Ok(self.index(point.x, point.y))
        } else {
            Err(MapError::OutOfBounds {
                x: point.x,
                y: point.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Number of stored cells, overflow ring included.
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    /// Storage index for `point`, or `None` outside `[0,width]x[0,height]`.
    pub fn cell_index(&self, point: Point) -> Option<usize> {
        self.checked_idx(point).ok()
    }

    fn in_storage(&self, point: Point) -> bool {
        point.x >= 0 && point.x <= self.width && point.y >= 0 && point.y <= self.height
    }

    /// True inside the logical map `[0,width)x[0,height)`.
    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn block_borders(&mut self) {
        for (x, y) in self.coordinates().map(|p| (p.x, p.y)).collect::<Vec<_>>() {
            if x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1 {
                let idx = self.index(x, y);
                self.blocked[idx] = true;
            }
        }
    }

    pub fn is_blocked(&self, point: Point) -> Result<bool, MapError> {
        self.checked_idx(point).map(|idx| self.blocked[idx])
    }

    pub fn mark_blocked(&mut self, point: Point) -> Result<(), MapError> {
        let idx = self.checked_idx(point)?;
        self.blocked[idx] = true;
        Ok(())
    }

    /// Reopens a tile inside the logical map. The overflow ring stays blocked.
    pub fn clear_blocked(&mut self, point: Point) -> Result<(), MapError> {
        let idx = self.checked_idx(point)?;
        if self.in_bounds(point) {
            self.blocked[idx] = false;
        }
        Ok(())
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        matches!(self.is_blocked(point), Ok(false))
    }

    /// Every logical coordinate, row by row (y outer, x inner).
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            width: self.width,
            height: self.height,
            next: 0,
        }
    }

    pub fn walkable_points(&self) -> Vec<Point> {
        self.coordinates()
            .filter(|&point| self.is_walkable(point))
            .collect()
    }

    /// Blocks each logical tile with a `1 / one_in` chance.
    pub fn scatter_noise(&mut self, rng: &mut RandomNumberGenerator, one_in: i32) -> usize {
        if one_in <= 0 {
            return 0;
        }
        let mut placed = 0;
        for point in self.coordinates().collect::<Vec<_>>() {
            if rng.range(0, one_in) == 0 {
                let idx = self.index(point.x, point.y);
                if !self.blocked[idx] {
                    placed += 1;
                }
                self.blocked[idx] = true;
            }
        }
        placed
    }
}

/// Restartable row-major walk over a map's logical coordinates.
#[derive(Clone, Debug)]
pub struct Coordinates {
    width: i32,
    height: i32,
    next: i32,
}

impl Iterator for Coordinates {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.width <= 0 || self.next >= self.width * self.height {
            return None;
        }
        let point = Point::new(self.next % self.width, self.next / self.width);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.width * self.height - self.next).max(0) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Coordinates {}
