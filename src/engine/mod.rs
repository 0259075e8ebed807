//! Engine — the walking gallery's session state and its per-tick update.
//!
//! The engine owns every piece of mutable state in one [`Session`]. Each
//! tick runs, in order: due timers, overlay exits, locomotion, camera,
//! proximity, viewer entry, progress. While an overlay stays up the tick ends
//! after the exits. It never deals with terminals, key codes, or
//! wall-clock time; the host feeds it an [`InputState`] and a `dt`.

pub mod camera;
pub mod catalog;
pub mod input;
pub mod locomotion;
pub mod progress;
pub mod proximity;
pub mod timer;
pub mod viewer;

use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use camera::Camera;
use catalog::Catalog;
use input::{Control, InputState};
use locomotion::{Actor, Locomotion, MAX_ACTORS};
use progress::{Progress, ViewOutcome};
use proximity::{ProximityResult, nearest_stand};
use timer::Scheduler;
use viewer::{Screen, Viewer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub proximity_threshold: f64,
    pub walk_speed: f64,
    pub reveal_interval_ms: u64,
    pub animation_fps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            proximity_threshold: proximity::DEFAULT_THRESHOLD,
            walk_speed: 350.0,
            reveal_interval_ms: 75,
            animation_fps: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ViewerOpened { photo_index: usize },
    ViewerClosed { photo_index: usize },
    RevealFinished { photo_index: usize },
    Counted { count: usize },
    UnlockShown,
    UnlockClosed,
}

pub struct Session {
    catalog: Catalog,
    tuning: Tuning,
    actors: Vec<Actor>,
    locomotion: Locomotion,
    camera: Camera,
    proximity: ProximityResult,
    viewer: Viewer,
    progress: Progress,
    scheduler: Scheduler,
}

impl Session {
    /// Start a session. `actors` must hold one to three actors; the first is
    /// the primary actor.
    pub fn new(catalog: Catalog, tuning: Tuning, mut actors: Vec<Actor>) -> Self {
        assert!(
            (1..=MAX_ACTORS).contains(&actors.len()),
            "a session needs 1..={MAX_ACTORS} actors, got {}",
            actors.len()
        );

        info!(
            "session started: {} photos, world width {}",
            catalog.len(),
            catalog.world_width()
        );

        for actor in &mut actors {
            actor.position.x = actor.position.x.clamp(0.0, catalog.world_width());
        }

        let locomotion = Locomotion::new(tuning.walk_speed, tuning.animation_fps);
        let viewer = Viewer::new(Duration::from_millis(tuning.reveal_interval_ms));
        let progress = Progress::new(catalog.len());
        let mut session = Session {
            catalog,
            tuning,
            actors,
            locomotion,
            camera: Camera::new(0.0),
            proximity: ProximityResult::NONE,
            viewer,
            progress,
            scheduler: Scheduler::new(),
        };
        session.refresh_surroundings();
        session
    }

    /// Advance the session by one tick.
    pub fn tick(&mut self, input: &InputState, dt: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        self.scheduler.advance(dt);
        while let Some(handle) = self.scheduler.pop_due() {
            if self.viewer.on_timer(handle, &self.catalog, &mut self.scheduler) {
                if let Some(session) = self.viewer.session() {
                    debug!("caption {} fully revealed", session.photo_index);
                    events.push(SessionEvent::RevealFinished {
                        photo_index: session.photo_index,
                    });
                }
            }
        }

        // The edge that closes an overlay is spent; it can't reopen one.
        let mut activate = input.is_just_pressed(Control::Activate);
        if self.viewer.is_open() {
            if activate || input.is_just_pressed(Control::Cancel) {
                self.close_overlay(&mut events);
                activate = false;
            }
            if self.viewer.is_open() {
                return events;
            }
        }

        self.locomotion.update(
            &mut self.actors,
            input.direction(),
            dt,
            self.catalog.world_width(),
        );
        self.refresh_surroundings();

        if let Some(photo_index) = self.proximity.nearest {
            if activate {
                self.open_viewer(photo_index, &mut events);
            }
        }

        events
    }

    fn refresh_surroundings(&mut self) {
        let primary_x = self.primary().position.x;
        self.camera.follow(primary_x, self.catalog.world_width());
        self.proximity =
            nearest_stand(primary_x, &self.catalog, self.tuning.proximity_threshold);
    }

    fn open_viewer(&mut self, photo_index: usize, events: &mut Vec<SessionEvent>) {
        debug!("opening viewer on photo {photo_index}");
        self.locomotion.freeze(&mut self.actors);
        self.viewer.open(photo_index, &self.catalog, &mut self.scheduler);
        events.push(SessionEvent::ViewerOpened { photo_index });

        match self.progress.record_view(photo_index) {
            ViewOutcome::AlreadyViewed => {}
            ViewOutcome::Counted { count } => events.push(SessionEvent::Counted { count }),
            ViewOutcome::Unlocked { count } => {
                info!("all {count} photos viewed");
                events.push(SessionEvent::Counted { count });
                self.viewer.queue_unlock();
            }
        }
    }

    fn close_overlay(&mut self, events: &mut Vec<SessionEvent>) {
        match self.viewer.close(&mut self.scheduler) {
            Screen::Viewing(session) => {
                debug!("viewer closed on photo {}", session.photo_index);
                events.push(SessionEvent::ViewerClosed {
                    photo_index: session.photo_index,
                });
                if matches!(self.viewer.screen(), Screen::Unlocked) {
                    info!("showing unlock overlay");
                    events.push(SessionEvent::UnlockShown);
                }
            }
            Screen::Unlocked => events.push(SessionEvent::UnlockClosed),
            Screen::Walking => {}
        }
    }

    /// Tell the camera how much of the world fits on screen.
    pub fn set_view_width(&mut self, view_width: f64) {
        self.camera.view_width = view_width;
        let primary_x = self.primary().position.x;
        self.camera.follow(primary_x, self.catalog.world_width());
    }

    pub fn primary(&self) -> &Actor {
        &self.actors[0]
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Result of the last proximity pass. Stale while an overlay is open.
    pub fn proximity(&self) -> ProximityResult {
        self.proximity
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Session time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }
}
