//! Viewer state machine — the full-screen photo overlay and the one-time
//! unlock overlay.
//!
//! The viewer owns the only timer in the session: the caption reveal. Its
//! handle lives in the [`ViewerSession`] and is cancelled when the session
//! ends, so a late firing can never touch a newer session.

use std::time::Duration;

use super::catalog::Catalog;
use super::timer::{Scheduler, TimerHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSession {
    pub photo_index: usize,
    /// Caption characters shown so far.
    pub revealed: usize,
    pending_reveal: Option<TimerHandle>,
}

impl ViewerSession {
    pub fn is_revealing(&self) -> bool {
        self.pending_reveal.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Walking,
    Viewing(ViewerSession),
    Unlocked,
}

#[derive(Debug)]
pub struct Viewer {
    screen: Screen,
    /// Set when the catalog completes while a photo is on screen; the unlock
    /// overlay waits for that photo to close.
    unlock_pending: bool,
    reveal_interval: Duration,
}

impl Viewer {
    pub fn new(reveal_interval: Duration) -> Self {
        Viewer {
            screen: Screen::Walking,
            unlock_pending: false,
            reveal_interval,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// True while any overlay holds the screen.
    pub fn is_open(&self) -> bool {
        !matches!(self.screen, Screen::Walking)
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        match &self.screen {
            Screen::Viewing(session) => Some(session),
            _ => None,
        }
    }

    pub fn unlock_pending(&self) -> bool {
        self.unlock_pending
    }

    /// Open the photo overlay on `photo_index`. The first character appears
    /// one reveal interval later.
    pub fn open(&mut self, photo_index: usize, catalog: &Catalog, scheduler: &mut Scheduler) {
        assert!(
            !self.is_open(),
            "viewer opened while {:?} is on screen",
            self.screen
        );

        let caption_len = catalog.entry(photo_index).caption_len();
        let pending_reveal = (caption_len > 0).then(|| scheduler.schedule(self.reveal_interval));
        self.screen = Screen::Viewing(ViewerSession {
            photo_index,
            revealed: 0,
            pending_reveal,
        });
    }

    /// Handle a fired timer. Returns `true` when this firing revealed the
    /// last caption character. Handles that don't belong to the current
    /// session are ignored.
    pub fn on_timer(
        &mut self,
        handle: TimerHandle,
        catalog: &Catalog,
        scheduler: &mut Scheduler,
    ) -> bool {
        let Screen::Viewing(session) = &mut self.screen else {
            return false;
        };
        if session.pending_reveal != Some(handle) {
            return false;
        }

        let caption_len = catalog.entry(session.photo_index).caption_len();
        session.revealed = (session.revealed + 1).min(caption_len);
        if session.revealed < caption_len {
            session.pending_reveal = Some(scheduler.schedule(self.reveal_interval));
            false
        } else {
            session.pending_reveal = None;
            true
        }
    }

    /// The catalog is complete. Shown once the current photo closes.
    pub fn queue_unlock(&mut self) {
        self.unlock_pending = true;
    }

    /// Close whatever overlay is up. Closing a photo with an unlock pending
    /// hands the screen straight to the unlock overlay.
    pub fn close(&mut self, scheduler: &mut Scheduler) -> Screen {
        let next = match &self.screen {
            Screen::Viewing(_) if self.unlock_pending => {
                self.unlock_pending = false;
                Screen::Unlocked
            }
            _ => Screen::Walking,
        };
        let previous = std::mem::replace(&mut self.screen, next);
        if let Screen::Viewing(session) = &previous {
            if let Some(handle) = session.pending_reveal {
                scheduler.cancel(handle);
            }
        }
        previous
    }
}

/// The first `revealed` characters of `caption`.
pub fn revealed_text(caption: &str, revealed: usize) -> &str {
    match caption.char_indices().nth(revealed) {
        Some((byte, _)) => &caption[..byte],
        None => caption,
    }
}
