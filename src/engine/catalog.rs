//! Photo catalog — the fixed, ordered list of photo stands in the hallway.
//!
//! Entries are immutable once the catalog is built. Everything else in the
//! engine refers to a photo by its index.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PHOTO_COUNT: usize = 20;
pub const FIRST_STAND_X: f64 = 600.0;
pub const STAND_SPACING: f64 = 1200.0;
pub const STAND_Y: f64 = 200.0;
/// Hallway left after the last stand's slot.
pub const TRAILING_MARGIN: f64 = 400.0;

const DEFAULT_CAPTIONS: [&str; DEFAULT_PHOTO_COUNT] = [
    "Our first trip together: a lake, a tent, and far too many mosquitoes.",
    "My favourite picture of you. I still can't look away from it.",
    "The evening light did half the work here. You did the other half.",
    "The night we danced until the lights came on.",
    "An ordinary Tuesday. Films, takeaway, and the good blanket.",
    "Proof that we cannot take a serious photo.",
    "Blurry fireworks, perfect night.",
    "The best picture on this whole wall.",
    "Snow everywhere and you somehow still warm.",
    "Attempt number forty-two at a decent selfie.",
    "One hundred days in a row. Let's never break the streak.",
    "Next time we eat at the café instead.",
    "Three of us asleep, the cat keeping watch.",
    "The cat, off duty.",
    "Like mother, like daughter.",
    "More walks together, even the ones I complain about.",
    "A love as hot as that soup.",
    "Somebody say cheese.",
    "To more good memories with everyone you love.",
    "And this is where the hallway ends. For now.",
];

pub const DEFAULT_UNLOCK_MESSAGE: &str = "You've seen every memory on this wall. Each photo is a piece of our story. Thank you for every moment together, for your warmth and your love. Here's to more happiness, more smiles, and more moments we'll never forget!";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no photos")]
    Empty,
    #[error("world width must be positive and finite, got {0}")]
    InvalidWorldWidth(f64),
    #[error("photo {index} has a non-finite position")]
    NonFinitePosition { index: usize },
    #[error("photo {index} at x={x} lies outside the world (0..={world_width})")]
    OutOfWorld { index: usize, x: f64, world_width: f64 },
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Opaque handle to a photo's image. The host resolves it to pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoEntry {
    pub index: usize,
    pub position: Point,
    pub image: ImageRef,
    pub caption: String,
}

impl PhotoEntry {
    /// Caption length in characters, the unit the viewer reveals in.
    pub fn caption_len(&self) -> usize {
        self.caption.chars().count()
    }
}

/// On-disk form of a catalog. Indices are implied by order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub world_width: f64,
    #[serde(default = "default_unlock_message")]
    pub unlock_message: String,
    pub photos: Vec<PhotoSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSource {
    pub x: f64,
    #[serde(default = "default_stand_y")]
    pub y: f64,
    pub image: ImageRef,
    pub caption: String,
}

fn default_unlock_message() -> String {
    DEFAULT_UNLOCK_MESSAGE.into()
}

fn default_stand_y() -> f64 {
    STAND_Y
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<PhotoEntry>,
    world_width: f64,
    unlock_message: String,
}

impl Catalog {
    /// Build a catalog from `(position, image, caption)` triples, assigning
    /// indices in order.
    pub fn new(
        world_width: f64,
        photos: impl IntoIterator<Item = (Point, ImageRef, String)>,
    ) -> Result<Self, CatalogError> {
        if !world_width.is_finite() || world_width <= 0.0 {
            return Err(CatalogError::InvalidWorldWidth(world_width));
        }

        let entries: Vec<PhotoEntry> = photos
            .into_iter()
            .enumerate()
            .map(|(index, (position, image, caption))| PhotoEntry {
                index,
                position,
                image,
                caption,
            })
            .collect();

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        for entry in &entries {
            let Point { x, y } = entry.position;
            if !x.is_finite() || !y.is_finite() {
                return Err(CatalogError::NonFinitePosition { index: entry.index });
            }
            if !(0.0..=world_width).contains(&x) {
                return Err(CatalogError::OutOfWorld {
                    index: entry.index,
                    x,
                    world_width,
                });
            }
        }

        Ok(Catalog {
            entries,
            world_width,
            unlock_message: DEFAULT_UNLOCK_MESSAGE.into(),
        })
    }

    pub fn with_unlock_message(mut self, message: impl Into<String>) -> Self {
        self.unlock_message = message.into();
        self
    }

    /// The built-in hallway: twenty stands, evenly spaced.
    pub fn builtin() -> Self {
        let world_width =
            FIRST_STAND_X + DEFAULT_PHOTO_COUNT as f64 * STAND_SPACING + TRAILING_MARGIN;
        let entries = DEFAULT_CAPTIONS
            .iter()
            .enumerate()
            .map(|(i, caption)| PhotoEntry {
                index: i,
                position: Point::new(FIRST_STAND_X + i as f64 * STAND_SPACING, STAND_Y),
                image: ImageRef(format!("assets/images/photos/{}.jpg", i + 1)),
                caption: (*caption).to_string(),
            })
            .collect();
        Catalog {
            entries,
            world_width,
            unlock_message: DEFAULT_UNLOCK_MESSAGE.into(),
        }
    }

    pub fn from_file_data(file: CatalogFile) -> Result<Self, CatalogError> {
        let photos = file
            .photos
            .into_iter()
            .map(|p| (Point::new(p.x, p.y), p.image, p.caption));
        Ok(Self::new(file.world_width, photos)?.with_unlock_message(file.unlock_message))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file_data(file)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_file_data(&self) -> CatalogFile {
        CatalogFile {
            world_width: self.world_width,
            unlock_message: self.unlock_message.clone(),
            photos: self
                .entries
                .iter()
                .map(|e| PhotoSource {
                    x: e.position.x,
                    y: e.position.y,
                    image: e.image.clone(),
                    caption: e.caption.clone(),
                })
                .collect(),
        }
    }

    /// Panics on an out-of-range index: callers only hold indices handed out
    /// by this catalog.
    pub fn entry(&self, index: usize) -> &PhotoEntry {
        &self.entries[index]
    }

    pub fn entries(&self) -> &[PhotoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    pub fn unlock_message(&self) -> &str {
        &self.unlock_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(x: f64, caption: &str) -> (Point, ImageRef, String) {
        (Point::new(x, STAND_Y), ImageRef(format!("{x}.png")), caption.into())
    }

    #[test]
    fn builtin_lays_out_twenty_stands() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), DEFAULT_PHOTO_COUNT);
        assert_eq!(catalog.world_width(), 25_000.0);
        assert_eq!(catalog.entry(0).position.x, 600.0);
        assert_eq!(catalog.entry(19).position.x, 23_400.0);
        assert_eq!(catalog.entry(19).image.as_str(), "assets/images/photos/20.jpg");
        for (i, entry) in catalog.entries().iter().enumerate() {
            assert_eq!(entry.index, i);
            assert!(!entry.caption.is_empty());
        }
    }

    #[test]
    fn indices_follow_order() {
        let catalog = Catalog::new(5000.0, [photo(100.0, "a"), photo(2000.0, "b")]).unwrap();
        assert_eq!(catalog.entry(1).index, 1);
        assert_eq!(catalog.entry(1).caption, "b");
    }

    #[test]
    fn rejects_empty_and_out_of_world() {
        assert!(matches!(
            Catalog::new(100.0, Vec::new()),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            Catalog::new(100.0, [photo(50.0, "a"), photo(150.0, "b")]),
            Err(CatalogError::OutOfWorld { index: 1, .. })
        ));
        assert!(matches!(
            Catalog::new(100.0, [photo(f64::NAN, "a")]),
            Err(CatalogError::NonFinitePosition { index: 0 })
        ));
        assert!(matches!(
            Catalog::new(-1.0, [photo(0.0, "a")]),
            Err(CatalogError::InvalidWorldWidth(_))
        ));
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{
            "world_width": 3000,
            "photos": [
                { "x": 600, "image": "one.jpg", "caption": "first" },
                { "x": 1800, "y": 250, "image": "two.jpg", "caption": "second" }
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entry(0).position, Point::new(600.0, STAND_Y));
        assert_eq!(catalog.entry(1).position.y, 250.0);
        assert_eq!(catalog.unlock_message(), DEFAULT_UNLOCK_MESSAGE);
    }

    #[test]
    fn loads_from_disk_and_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = serde_json::to_string_pretty(&Catalog::builtin().to_file_data()).unwrap();
        std::fs::write(&path, json).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), DEFAULT_PHOTO_COUNT);
        assert_eq!(catalog.entry(3).caption, Catalog::builtin().entry(3).caption);

        let missing = Catalog::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }

    #[test]
    fn caption_len_counts_chars_not_bytes() {
        let catalog = Catalog::new(1000.0, [photo(10.0, "héllo ♥")]).unwrap();
        assert_eq!(catalog.entry(0).caption_len(), 7);
    }

    #[test]
    #[should_panic]
    fn out_of_range_entry_panics() {
        let catalog = Catalog::new(1000.0, [photo(10.0, "a")]).unwrap();
        let _ = catalog.entry(1);
    }
}
