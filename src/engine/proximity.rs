use super::catalog::Catalog;

pub const DEFAULT_THRESHOLD: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityResult {
    pub nearest: Option<usize>,
    /// Horizontal distance to `nearest`; infinite when nothing is in range.
    pub distance: f64,
}

impl ProximityResult {
    pub const NONE: ProximityResult = ProximityResult {
        nearest: None,
        distance: f64::INFINITY,
    };
}

/// Nearest stand strictly within `threshold` of `actor_x`, measured along x
/// only. Ties go to the lower catalog index.
pub fn nearest_stand(actor_x: f64, catalog: &Catalog, threshold: f64) -> ProximityResult {
    let mut result = ProximityResult::NONE;
    for entry in catalog.entries() {
        let distance = (actor_x - entry.position.x).abs();
        if distance < threshold && distance < result.distance {
            result = ProximityResult {
                nearest: Some(entry.index),
                distance,
            };
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::{ImageRef, Point};

    fn catalog(xs: &[f64]) -> Catalog {
        Catalog::new(
            10_000.0,
            xs.iter()
                .map(|&x| (Point::new(x, 200.0), ImageRef("p.jpg".into()), "c".to_string())),
        )
        .unwrap()
    }

    #[test]
    fn picks_the_closest_stand_in_range() {
        let catalog = catalog(&[100.0, 2000.0, 4000.0]);
        let result = nearest_stand(0.0, &catalog, DEFAULT_THRESHOLD);
        assert_eq!(result.nearest, Some(0));
        assert_eq!(result.distance, 100.0);

        let result = nearest_stand(1950.0, &catalog, DEFAULT_THRESHOLD);
        assert_eq!(result.nearest, Some(1));
    }

    #[test]
    fn threshold_is_exclusive() {
        let catalog = catalog(&[1000.0]);
        assert_eq!(nearest_stand(850.0, &catalog, 150.0), ProximityResult::NONE);
        assert_eq!(nearest_stand(851.0, &catalog, 150.0).nearest, Some(0));
        assert_eq!(nearest_stand(1150.0, &catalog, 150.0).nearest, None);
    }

    #[test]
    fn ties_go_to_the_lower_index() {
        let catalog = catalog(&[100.0, 300.0]);
        let result = nearest_stand(200.0, &catalog, 150.0);
        assert_eq!(result.nearest, Some(0));
        assert_eq!(result.distance, 100.0);
    }

    #[test]
    fn nothing_in_range_for_any_position_far_away() {
        let catalog = catalog(&[100.0, 2000.0, 4000.0]);
        for x in [500.0, 1000.0, 1850.0, 2150.0, 3000.0, 9000.0] {
            assert_eq!(nearest_stand(x, &catalog, 150.0).nearest, None, "x = {x}");
        }
    }
}
