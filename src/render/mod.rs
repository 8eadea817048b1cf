use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::{
    ecs::{TurnEngine, components::CombatStats},
    map::{GridMap, VisibleRegion},
};

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';

/// Draws the visible slice of the map with its top-left tile at `origin`.
/// Cells that fall off the console are skipped.
pub fn draw_map(ctx: &mut BTerm, map: &GridMap, region: &VisibleRegion, origin: Point) {
    let (screen_w, screen_h) = ctx.get_char_size();
    for point in region.iter() {
        let screen = to_screen(region, origin, point);
        if screen.x < 0 || screen.y < 0 || screen.x >= screen_w as i32 || screen.y >= screen_h as i32 {
            continue;
        }
        let (fg, glyph) = match map.is_blocked(point) {
            Ok(false) => (RGB::named(DIM_GRAY), FLOOR_GLYPH),
            Ok(true) => (RGB::named(SLATE_GRAY), WALL_GLYPH),
            Err(_) => continue,
        };
        ctx.set(screen.x, screen.y, fg, RGB::named(BLACK), to_cp437(glyph));
    }
}

/// Entities inside the camera, lowest render order first.
pub fn draw_entities(ctx: &mut BTerm, engine: &TurnEngine, origin: Point) {
    let region = engine.visible_region();
    engine.each_renderable(|point, renderable| {
        if !region.contains(point) {
            return;
        }
        let screen = to_screen(&region, origin, point);
        ctx.set(
            screen.x,
            screen.y,
            renderable.color,
            RGB::named(BLACK),
            renderable.glyph,
        );
    });
}

pub fn draw_status(ctx: &mut BTerm, y: i32, turn: u64, stats: Option<&CombatStats>) {
    ctx.print_color(2, y, RGB::named(YELLOW), RGB::named(BLACK), format!("Turn {turn}"));
    if let Some(stats) = stats {
        let color = if stats.health * 4 <= stats.max_health {
            RGB::named(ORANGE)
        } else {
            RGB::named(LIGHT_GREEN)
        };
        ctx.print_color(
            16,
            y,
            color,
            RGB::named(BLACK),
            format!("HP {}/{}", stats.health, stats.max_health),
        );
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, height) = ctx.get_char_size();
    let rows = (height as i32 - start_y - 3).max(0) as usize;
    ctx.draw_box(
        0,
        start_y,
        width as i32 - 1,
        rows as i32 + 1,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    for (row, entry) in log.iter().take(rows).enumerate() {
        ctx.print(2, start_y + 1 + row as i32, entry);
    }
}

fn to_screen(region: &VisibleRegion, origin: Point, point: Point) -> Point {
    Point::new(origin.x + point.x - region.x1, origin.y + point.y - region.y1)
}
