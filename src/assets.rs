//! Photo assets — decoded once at start, drawn as half-block cells.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, warn};

use crate::engine::catalog::{Catalog, ImageRef};
use crate::hud::PhotoArt;
use crate::types::{Cell, Color, Style};

/// Decoded photos are capped at this size; the terminal never needs more.
const MAX_PIXELS_WIDE: u32 = 160;
const MAX_PIXELS_HIGH: u32 = 120;

#[derive(Default)]
pub struct PhotoAssets {
    images: HashMap<ImageRef, RgbImage>,
}

impl PhotoAssets {
    /// Load every catalog image, resolving relative paths against
    /// `base_dir`. Failures are logged and the photo is left without art.
    pub fn load(catalog: &Catalog, base_dir: &Path) -> Self {
        let mut images = HashMap::new();
        for entry in catalog.entries() {
            let path = base_dir.join(entry.image.as_str());
            match image::open(&path) {
                Ok(decoded) => {
                    let small = decoded.thumbnail(MAX_PIXELS_WIDE, MAX_PIXELS_HIGH).to_rgb8();
                    debug!(
                        "photo {} loaded from {} ({}x{})",
                        entry.index + 1,
                        path.display(),
                        small.width(),
                        small.height()
                    );
                    images.insert(entry.image.clone(), small);
                }
                Err(e) => warn!(
                    "failed to load photo {} from {}: {e}",
                    entry.index + 1,
                    path.display()
                ),
            }
        }
        PhotoAssets { images }
    }

    pub fn loaded(&self) -> usize {
        self.images.len()
    }
}

impl PhotoArt for PhotoAssets {
    /// Each cell shows two vertically stacked pixels: the upper half block
    /// takes the top pixel as foreground and the bottom one as background.
    fn art(&self, image: &ImageRef, cols: u16, rows: u16) -> Option<Vec<Vec<Cell>>> {
        let source = self.images.get(image)?;
        if cols == 0 || rows == 0 {
            return Some(Vec::new());
        }
        let scaled = imageops::resize(source, cols as u32, rows as u32 * 2, FilterType::Triangle);

        let cells = (0..rows as u32)
            .map(|row| {
                (0..cols as u32)
                    .map(|col| {
                        let top = scaled.get_pixel(col, row * 2).0;
                        let bottom = scaled.get_pixel(col, row * 2 + 1).0;
                        Cell {
                            ch: '▀',
                            style: Style {
                                fg: Some(Color::Rgb { r: top[0], g: top[1], b: top[2] }),
                                bg: Some(Color::Rgb { r: bottom[0], g: bottom[1], b: bottom[2] }),
                                ..Default::default()
                            },
                        }
                    })
                    .collect()
            })
            .collect();
        Some(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::Point;
    use image::Rgb;

    #[test]
    fn loads_what_exists_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(8, 8, Rgb([200, 10, 10]))
            .save(dir.path().join("red.png"))
            .unwrap();

        let catalog = Catalog::new(
            2000.0,
            [
                (Point::new(100.0, 200.0), ImageRef("red.png".into()), "red".to_string()),
                (Point::new(900.0, 200.0), ImageRef("missing.png".into()), "gone".to_string()),
            ],
        )
        .unwrap();
        let assets = PhotoAssets::load(&catalog, dir.path());
        assert_eq!(assets.loaded(), 1);

        let art = assets.art(&ImageRef("red.png".into()), 4, 2).unwrap();
        assert_eq!(art.len(), 2);
        assert_eq!(art[0].len(), 4);
        let cell = &art[1][3];
        assert_eq!(cell.ch, '▀');
        assert_eq!(cell.style.fg, Some(Color::Rgb { r: 200, g: 10, b: 10 }));
        assert_eq!(cell.style.bg, Some(Color::Rgb { r: 200, g: 10, b: 10 }));

        assert!(assets.art(&ImageRef("missing.png".into()), 4, 2).is_none());
    }
}
