use super::catalog::Point;

/// Follows the primary actor, clamped so the view never leaves the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scroll: Point,
    pub view_width: f64,
}

impl Camera {
    pub fn new(view_width: f64) -> Self {
        Camera {
            scroll: Point::new(0.0, 0.0),
            view_width,
        }
    }

    pub fn follow(&mut self, target_x: f64, world_width: f64) {
        let max_scroll = (world_width - self.view_width).max(0.0);
        self.scroll.x = (target_x - self.view_width / 2.0).clamp(0.0, max_scroll);
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(world.x - self.scroll.x, world.y - self.scroll.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_on_target_inside_bounds() {
        let mut camera = Camera::new(3200.0);
        camera.follow(10_000.0, 25_000.0);
        assert_eq!(camera.scroll.x, 8400.0);
        assert_eq!(camera.to_screen(Point::new(10_000.0, 600.0)), Point::new(1600.0, 600.0));
    }

    #[test]
    fn clamps_at_both_walls() {
        let mut camera = Camera::new(3200.0);
        camera.follow(230.0, 25_000.0);
        assert_eq!(camera.scroll.x, 0.0);
        camera.follow(24_900.0, 25_000.0);
        assert_eq!(camera.scroll.x, 21_800.0);
    }

    #[test]
    fn world_narrower_than_view_never_scrolls() {
        let mut camera = Camera::new(3200.0);
        camera.follow(2000.0, 1000.0);
        assert_eq!(camera.scroll.x, 0.0);
    }
}
