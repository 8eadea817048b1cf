use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use smallvec::SmallVec;

use crate::{error::PathError, map::GridMap};

/// Multiplier applied to every finite entry when the owner is fleeing. The
/// extra 0.2 makes a step away beat standing still.
pub const FLEE_SCALE: f32 = -1.2;

/// Neighbourhood scan order. On equal scores the later offset wins.
pub const STEP_ORDER: [Point; 9] = [
    Point { x: -1, y: -1 },
    Point { x: 0, y: -1 },
    Point { x: 1, y: -1 },
    Point { x: -1, y: 0 },
    Point { x: 0, y: 0 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 1 },
    Point { x: 1, y: 0 },
    Point { x: 1, y: 1 },
];

/// Per-tile Manhattan distance to a target. This is a heuristic: walls do not
/// lengthen routes, they only leave their own tile unscored.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    width: i32,
    height: i32,
    values: Vec<Option<f32>>,
}

impl DistanceField {
    /// An all-unreachable field matching `grid`'s storage.
    pub fn unreachable(grid: &GridMap) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            values: vec![None; grid.cell_count()],
        }
    }

    pub fn compute(grid: &GridMap, target: Point, occupied: &[Point], fleeing: bool) -> Self {
        let mut field = Self::unreachable(grid);
        field.recompute(grid, target, occupied, fleeing);
        field
    }

    /// Refills the field in place. `occupied` lists tiles of other entities
    /// and must not contain the target or the field's owner.
    pub fn recompute(&mut self, grid: &GridMap, target: Point, occupied: &[Point], fleeing: bool) {
        if self.values.len() != grid.cell_count() {
            *self = Self::unreachable(grid);
        }
        self.values.iter_mut().for_each(|value| *value = None);

        if let Some(idx) = grid.cell_index(target) {
            self.values[idx] = Some(0.0);
        }

        for point in grid.coordinates() {
            if !grid.is_walkable(point) || occupied.contains(&point) {
                continue;
            }
            if let Some(idx) = grid.cell_index(point) {
                self.values[idx] = Some(DistanceAlg::Manhattan.distance2d(point, target));
            }
        }

        if fleeing {
            for value in self.values.iter_mut().flatten() {
                *value *= FLEE_SCALE;
            }
        }
    }

    pub fn value(&self, point: Point) -> Option<f32> {
        if point.x < 0 || point.x > self.width || point.y < 0 || point.y > self.height {
            return None;
        }
        let idx = (point.y * (self.width + 1) + point.x) as usize;
        self.values.get(idx).copied().flatten()
    }

    #[cfg(test)]
    pub(crate) fn set_value(&mut self, point: Point, value: Option<f32>) {
        let idx = (point.y * (self.width + 1) + point.x) as usize;
        self.values[idx] = value;
    }
}

/// Greedy descent: the offset of the lowest-scored cell in the 3x3
/// neighbourhood around `from`, staying put included.
pub fn select_step(field: &DistanceField, from: Point) -> Result<Point, PathError> {
    let viable: SmallVec<[(Point, f32); 9]> = STEP_ORDER
        .iter()
        .filter_map(|&offset| {
            let cell = Point::new(from.x + offset.x, from.y + offset.y);
            field.value(cell).map(|value| (offset, value))
        })
        .collect();

    let mut best: Option<(Point, f32)> = None;
    for (offset, value) in viable {
        if best.is_none_or(|(_, lowest)| value <= lowest) {
            best = Some((offset, value));
        }
    }

    best.map(|(offset, _)| offset).ok_or(PathError::NoViableStep {
        x: from.x,
        y: from.y,
    })
}
