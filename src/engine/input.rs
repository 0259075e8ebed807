use std::collections::HashSet;

/// Logical controls the session reacts to. The host maps physical keys onto
/// these through the configured key bindings.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Control {
    Left,
    Right,
    Activate,
    Cancel,
}

/// Per-tick snapshot of control state.
///
/// A control is *just pressed* only on the tick it goes from released to
/// held; key repeats while held do not produce another edge.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    pressed: HashSet<Control>,
    held: HashSet<Control>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_just_pressed(&self, control: Control) -> bool {
        self.pressed.contains(&control)
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn set_pressed(&mut self, control: Control) {
        if self.held.insert(control) {
            self.pressed.insert(control);
        }
    }

    pub fn set_released(&mut self, control: Control) {
        self.held.remove(&control);
    }

    /// Drop this tick's edges. Held controls stay held.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    /// Horizontal intent: -1 for left only, +1 for right only, 0 otherwise.
    pub fn direction(&self) -> i8 {
        match (self.is_held(Control::Left), self.is_held(Control::Right)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_until_end_of_tick() {
        let mut input = InputState::new();
        input.set_pressed(Control::Activate);
        assert!(input.is_just_pressed(Control::Activate));
        assert!(input.is_held(Control::Activate));

        input.end_tick();
        assert!(!input.is_just_pressed(Control::Activate));
        assert!(input.is_held(Control::Activate));
    }

    #[test]
    fn repeat_while_held_is_not_a_new_edge() {
        let mut input = InputState::new();
        input.set_pressed(Control::Activate);
        input.end_tick();
        input.set_pressed(Control::Activate);
        assert!(!input.is_just_pressed(Control::Activate));

        input.set_released(Control::Activate);
        input.set_pressed(Control::Activate);
        assert!(input.is_just_pressed(Control::Activate));
    }

    #[test]
    fn both_directions_cancel_out() {
        let mut input = InputState::new();
        assert_eq!(input.direction(), 0);
        input.set_pressed(Control::Left);
        assert_eq!(input.direction(), -1);
        input.set_pressed(Control::Right);
        assert_eq!(input.direction(), 0);
        input.set_released(Control::Left);
        assert_eq!(input.direction(), 1);
    }
}
