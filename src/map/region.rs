use bracket_geometry::prelude::Point;

use super::GridMap;

/// Converts a pixel viewport into whole tiles.
pub fn display_to_map(width_px: i32, height_px: i32, tile_px: i32) -> (i32, i32) {
    let tile_px = tile_px.max(1);
    (width_px / tile_px, height_px / tile_px)
}

/// Camera window over the map. Bounds are inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleRegion {
    pub x1: i32,
    pub x2: i32,
    pub y1: i32,
    pub y2: i32,
}

impl VisibleRegion {
    pub const fn new(x1: i32, x2: i32, y1: i32, y2: i32) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Centres a `tiles_wide` by `tiles_high` window on `viewer`, then slides
    /// it back inside the map where it would hang over an edge.
    pub fn around(viewer: Point, map: &GridMap, tiles_wide: i32, tiles_high: i32) -> Self {
        let (x1, x2) = clamp_axis(viewer.x, tiles_wide.max(0), map.width);
        let (y1, y2) = clamp_axis(viewer.y, tiles_high.max(0), map.height);
        Self { x1, x2, y1, y2 }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + Clone + use<> {
        let Self { x1, x2, y1, y2 } = *self;
        (y1..=y2).flat_map(move |y| (x1..=x2).map(move |x| Point::new(x, y)))
    }
}

fn clamp_axis(centre: i32, span: i32, limit: i32) -> (i32, i32) {
    let mut low = centre - span / 2;
    let mut high = low + span;
    if high > limit {
        high = limit;
        low = limit - span;
    } else if low < 0 {
        high += -low;
        low = 0;
    }
    // A viewport wider than the map is cut down to the map itself.
    (low.max(0), high.min(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pixels_floor_to_tiles() {
        assert_eq!(display_to_map(800, 480, 16), (50, 30));
        assert_eq!(display_to_map(1600, 1280, 16), (100, 80));
        assert_eq!(display_to_map(31, 17, 16), (1, 1));
    }

    #[test]
    fn centred_when_the_map_allows() {
        let map = GridMap::new(100, 80);
        let region = VisibleRegion::around(Point::new(50, 40), &map, 50, 30);
        assert_eq!(region, VisibleRegion::new(25, 75, 25, 55));
        assert!(region.contains(Point::new(50, 40)));
    }

    #[test]
    fn slides_right_at_the_left_edge() {
        let map = GridMap::new(100, 80);
        let region = VisibleRegion::around(Point::new(3, 2), &map, 50, 30);
        assert_eq!(region, VisibleRegion::new(0, 50, 0, 30));
    }

    #[test]
    fn slides_left_at_the_right_edge() {
        let map = GridMap::new(100, 80);
        let region = VisibleRegion::around(Point::new(98, 78), &map, 50, 30);
        assert_eq!(region, VisibleRegion::new(50, 100, 50, 80));
    }

    #[test]
    fn oversized_viewport_is_clipped() {
        let map = GridMap::new(20, 10);
        let region = VisibleRegion::around(Point::new(10, 5), &map, 50, 30);
        assert_eq!(region, VisibleRegion::new(0, 20, 0, 10));
    }

    #[test]
    fn iteration_is_inclusive() {
        let region = VisibleRegion::new(2, 4, 1, 2);
        let points: Vec<_> = region.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            points,
            vec![(2, 1), (3, 1), (4, 1), (2, 2), (3, 2), (4, 2)]
        );
        assert!(region.contains(Point::new(4, 2)));
        assert!(!region.contains(Point::new(5, 2)));
    }

    #[test]
    fn iterated_tiles_are_all_addressable() {
        let map = GridMap::new(40, 30);
        let region = VisibleRegion::around(Point::new(39, 29), &map, 20, 10);
        assert!(region.iter().all(|point| map.is_blocked(point).is_ok()));
    }

    proptest! {
        #[test]
        fn region_stays_inside_the_map(
            width in 1i32..200,
            height in 1i32..200,
            vx in -5i32..205,
            vy in -5i32..205,
            tiles_wide in 0i32..120,
            tiles_high in 0i32..120,
        ) {
            let map = GridMap::new(width, height);
            let region = VisibleRegion::around(Point::new(vx, vy), &map, tiles_wide, tiles_high);
            prop_assert!(0 <= region.x1 && region.x1 <= region.x2 && region.x2 <= width);
            prop_assert!(0 <= region.y1 && region.y1 <= region.y2 && region.y2 <= height);
            if tiles_wide <= width {
                prop_assert_eq!(region.width(), tiles_wide);
            }
            if tiles_high <= height {
                prop_assert_eq!(region.height(), tiles_high);
            }
        }
    }
}
