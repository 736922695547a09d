//! # Input State
//!
//! The platform layer owns the actual event source (window, keyboard); this
//! module owns what the simulation sees: a map from key to "is held" plus an
//! edge-triggered single-press flag that fires once per key-down transition.
//!
//! Platform callbacks may run outside the frame callback, so transitions go
//! through a lock-guarded [`InputQueue`] that the frame driver drains at the
//! top of every frame.

use parking_lot::Mutex;

/// The keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Key {
    /// W.
    W = 0,
    /// A.
    A = 1,
    /// S.
    S = 2,
    /// D.
    D = 3,
    /// Q.
    Q = 4,
    /// E.
    E = 5,
    /// Space bar.
    Space = 6,
    /// Left arrow.
    ArrowLeft = 7,
    /// Right arrow.
    ArrowRight = 8,
    /// Up arrow.
    ArrowUp = 9,
    /// Down arrow.
    ArrowDown = 10,
}

/// Number of tracked keys.
pub const KEY_COUNT: usize = 11;

/// One key transition reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub key: Key,
    /// `true` on key-down, `false` on key-up.
    pub down: bool,
}

/// Per-frame keyboard state.
#[derive(Debug, Default)]
pub struct InputState {
    held: [bool; KEY_COUNT],
    pressed: [bool; KEY_COUNT],
}

impl InputState {
    /// Creates a state with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key-down transition. The single-press flag is set only on
    /// the transition, not while the key is held.
    #[inline]
    pub fn key_down(&mut self, key: Key) {
        let index = key as usize;
        if !self.held[index] {
            self.pressed[index] = true;
        }
        self.held[index] = true;
    }

    /// Records a key-up transition.
    #[inline]
    pub fn key_up(&mut self, key: Key) {
        self.held[key as usize] = false;
    }

    /// Whether the key is currently held.
    #[inline]
    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.held[key as usize]
    }

    /// Consumes the single-press flag: returns `true` once per key-down
    /// transition, then `false` until the key is released and pressed again.
    #[inline]
    pub fn take_pressed(&mut self, key: Key) -> bool {
        std::mem::take(&mut self.pressed[key as usize])
    }
}

/// Lock-guarded transition queue between platform callbacks and the frame
/// driver. The only cross-thread touch point in the engine.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Mutex<Vec<KeyEvent>>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one transition. Called from platform callbacks.
    pub fn push(&self, event: KeyEvent) {
        self.events.lock().push(event);
    }

    /// Drains every queued transition into the given state, in arrival
    /// order. Called by the frame driver before the support systems run.
    pub fn drain_into(&self, state: &mut InputState) {
        for event in self.events.lock().drain(..) {
            if event.down {
                state.key_down(event.key);
            } else {
                state.key_up(event.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_state() {
        let mut state = InputState::new();
        assert!(!state.is_held(Key::A));

        state.key_down(Key::A);
        assert!(state.is_held(Key::A));

        state.key_up(Key::A);
        assert!(!state.is_held(Key::A));
    }

    #[test]
    fn test_single_press_fires_once_per_transition() {
        let mut state = InputState::new();

        state.key_down(Key::Space);
        assert!(state.take_pressed(Key::Space));
        // Held, not re-pressed: must not fire again.
        assert!(!state.take_pressed(Key::Space));

        // Repeated key-down without a key-up (OS auto-repeat) is not a
        // transition either.
        state.key_down(Key::Space);
        assert!(!state.take_pressed(Key::Space));

        state.key_up(Key::Space);
        state.key_down(Key::Space);
        assert!(state.take_pressed(Key::Space));
    }

    #[test]
    fn test_queue_drains_in_order() {
        let queue = InputQueue::new();
        let mut state = InputState::new();

        queue.push(KeyEvent {
            key: Key::D,
            down: true,
        });
        queue.push(KeyEvent {
            key: Key::D,
            down: false,
        });
        queue.drain_into(&mut state);

        assert!(!state.is_held(Key::D));
        // The down transition still registered a single press.
        assert!(state.take_pressed(Key::D));
    }
}
