//! Key state for terminals that report presses but never releases.
//!
//! Directional controls count as held until their presses and auto-repeats
//! stop arriving for the hold window. Activate and cancel only ever matter
//! as edges, so they are released right after the tick that sees them. A
//! press that follows the previous one within the repeat gap is taken as
//! auto-repeat and ignored; anything slower is a fresh tap.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::engine::input::{Control, InputState};

fn is_trigger(control: Control) -> bool {
    matches!(control, Control::Activate | Control::Cancel)
}

#[derive(Debug)]
pub struct PressOnlyKeys {
    hold_window: Duration,
    repeat_gap: Duration,
    /// Last press or repeat per control.
    last_seen: HashMap<Control, Instant>,
}

impl PressOnlyKeys {
    pub fn new(hold_window: Duration, repeat_gap: Duration) -> Self {
        PressOnlyKeys {
            hold_window,
            repeat_gap,
            last_seen: HashMap::new(),
        }
    }

    /// A press or auto-repeat of `control` arrived at `now`.
    pub fn press(&mut self, control: Control, now: Instant, input: &mut InputState) {
        let previous = self.last_seen.insert(control, now);
        if !is_trigger(control) {
            input.set_pressed(control);
            return;
        }
        let repeat = previous.is_some_and(|seen| now.duration_since(seen) < self.repeat_gap);
        if !repeat {
            input.set_released(control);
            input.set_pressed(control);
        }
    }

    /// Release directional controls whose presses have gone quiet.
    pub fn expire(&mut self, now: Instant, input: &mut InputState) {
        let window = self.hold_window;
        self.last_seen.retain(|&control, &mut seen| {
            let held = now.duration_since(seen) < window;
            if !held && !is_trigger(control) {
                input.set_released(control);
            }
            held
        });
    }

    /// Call once the session has consumed the tick's edges.
    pub fn end_tick(&self, input: &mut InputState) {
        input.set_released(Control::Activate);
        input.set_released(Control::Cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn keys() -> PressOnlyKeys {
        PressOnlyKeys::new(500 * MS, 100 * MS)
    }

    /// One poll-and-tick round: press, let the session look, end the tick.
    fn tick_with_press(
        keys: &mut PressOnlyKeys,
        input: &mut InputState,
        control: Control,
        at: Instant,
    ) -> bool {
        keys.press(control, at, input);
        keys.expire(at, input);
        let edge = input.is_just_pressed(control);
        keys.end_tick(input);
        input.end_tick();
        edge
    }

    #[test]
    fn quick_second_tap_is_a_new_press() {
        let mut keys = keys();
        let mut input = InputState::new();
        let start = Instant::now();

        assert!(tick_with_press(&mut keys, &mut input, Control::Activate, start));
        assert!(!input.is_held(Control::Activate));
        assert!(tick_with_press(&mut keys, &mut input, Control::Activate, start + 250 * MS));
    }

    #[test]
    fn auto_repeat_stream_is_not_a_new_press() {
        let mut keys = keys();
        let mut input = InputState::new();
        let start = Instant::now();

        assert!(tick_with_press(&mut keys, &mut input, Control::Cancel, start));
        for n in 1..20u32 {
            let at = start + MS * 40 * n;
            assert!(!tick_with_press(&mut keys, &mut input, Control::Cancel, at));
        }
    }

    #[test]
    fn direction_holds_until_the_window_passes() {
        let mut keys = keys();
        let mut input = InputState::new();
        let start = Instant::now();

        keys.press(Control::Right, start, &mut input);
        keys.end_tick(&mut input);
        input.end_tick();

        keys.expire(start + 400 * MS, &mut input);
        assert_eq!(input.direction(), 1);

        keys.press(Control::Right, start + 450 * MS, &mut input);
        keys.expire(start + 900 * MS, &mut input);
        assert_eq!(input.direction(), 1);

        keys.expire(start + 950 * MS, &mut input);
        assert_eq!(input.direction(), 0);
    }
}
