use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The photo had been seen before; nothing changed.
    AlreadyViewed,
    Counted { count: usize },
    /// This view completed the catalog. Reported once per session.
    Unlocked { count: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlockState {
    pub shown: bool,
}

/// Distinct photos viewed so far. Only ever grows.
#[derive(Debug, Clone)]
pub struct Progress {
    viewed: BTreeSet<usize>,
    catalog_size: usize,
    unlock: UnlockState,
}

impl Progress {
    pub fn new(catalog_size: usize) -> Self {
        Progress {
            viewed: BTreeSet::new(),
            catalog_size,
            unlock: UnlockState::default(),
        }
    }

    /// Record a first view of `index`. Panics if `index` is outside the
    /// catalog.
    pub fn record_view(&mut self, index: usize) -> ViewOutcome {
        assert!(
            index < self.catalog_size,
            "photo index {index} outside catalog of {}",
            self.catalog_size
        );

        if !self.viewed.insert(index) {
            return ViewOutcome::AlreadyViewed;
        }

        let count = self.count();
        if count == self.catalog_size && !self.unlock.shown {
            self.unlock.shown = true;
            ViewOutcome::Unlocked { count }
        } else {
            ViewOutcome::Counted { count }
        }
    }

    pub fn count(&self) -> usize {
        self.viewed.len()
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    pub fn has_viewed(&self, index: usize) -> bool {
        self.viewed.contains(&index)
    }

    pub fn unlock(&self) -> UnlockState {
        self.unlock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_views_count_once() {
        let mut progress = Progress::new(3);
        assert_eq!(progress.record_view(1), ViewOutcome::Counted { count: 1 });
        for _ in 0..5 {
            assert_eq!(progress.record_view(1), ViewOutcome::AlreadyViewed);
        }
        assert_eq!(progress.count(), 1);
        assert!(progress.has_viewed(1));
        assert!(!progress.has_viewed(0));
    }

    #[test]
    fn unlock_fires_once_on_the_last_distinct_photo() {
        let mut progress = Progress::new(20);
        let order: Vec<usize> = (0..20).rev().chain([3, 7, 0]).chain(0..20).collect();

        let mut unlocks = 0;
        for (n, &index) in order.iter().enumerate() {
            if let ViewOutcome::Unlocked { count } = progress.record_view(index) {
                unlocks += 1;
                assert_eq!(count, 20);
                assert_eq!(n, 19, "unlock must come with the twentieth distinct photo");
            }
        }
        assert_eq!(unlocks, 1);
        assert!(progress.unlock().shown);
    }

    #[test]
    fn no_unlock_while_any_photo_is_missing() {
        let mut progress = Progress::new(4);
        for index in [0, 1, 1, 2, 0, 2] {
            progress.record_view(index);
        }
        assert_eq!(progress.count(), 3);
        assert!(!progress.unlock().shown);
    }

    #[test]
    #[should_panic(expected = "outside catalog")]
    fn out_of_range_index_panics() {
        Progress::new(2).record_view(2);
    }
}
