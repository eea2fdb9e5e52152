//! Input sampling
//!
//! Raw events (keyboard, pointer, touch) mutate an `InputState` whenever
//! they arrive. The simulation polls `sample()` once per tick and gets an
//! `InputSnapshot`; one-shot presses are latched until sampled, then
//! cleared. Devices that never report anything leave every signal at its
//! default.

use glam::Vec2;
use std::collections::VecDeque;

/// Platform-neutral key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    A,
    D,
    W,
    P,
    Q,
    R,
    Space,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Key {
        match code {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "KeyA" => Key::A,
            "KeyD" => Key::D,
            "KeyW" => Key::W,
            "KeyP" => Key::P,
            "KeyQ" => Key::Q,
            "KeyR" => Key::R,
            "Space" => Key::Space,
            "Enter" | "NumpadEnter" => Key::Enter,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// A raw input event in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd,
}

/// Everything one simulation tick may read
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// A finger is on the screen
    pub touching: bool,
    /// Last known pointer position (logical coordinates)
    pub pointer: Option<Vec2>,
    /// One-shot: action key (boost / glare)
    pub action: bool,
    /// One-shot: pointer or touch press
    pub tap: bool,
    /// One-shot: pause toggle
    pub pause: bool,
    /// One-shot: confirm / retry
    pub confirm: bool,
    /// One-shot: back to the title screen
    pub exit: bool,
}

/// Anything the driver can poll once per tick
pub trait InputSource {
    fn sample(&mut self) -> InputSnapshot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Horizontal swipe distance that flips the held side
const SWIPE_THRESHOLD: f32 = 30.0;

/// Event-driven input state
#[derive(Debug, Clone)]
pub struct InputState {
    /// Logical width, used to split presses into left/right halves
    width: f32,
    held: Vec<Key>,
    press_side: Option<Side>,
    touch_origin: Option<Vec2>,
    touching: bool,
    pointer: Option<Vec2>,
    action: bool,
    tap: bool,
    pause: bool,
    confirm: bool,
    exit: bool,
}

impl InputState {
    pub fn new(logical_width: f32) -> Self {
        Self {
            width: logical_width,
            held: Vec::new(),
            press_side: None,
            touch_origin: None,
            touching: false,
            pointer: None,
            action: false,
            tap: false,
            pause: false,
            confirm: false,
            exit: false,
        }
    }

    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn side_of(&self, p: Vec2) -> Side {
        if p.x < self.width / 2.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn handle(&mut self, event: RawEvent) {
        match event {
            RawEvent::KeyDown(key) => {
                if !self.is_held(key) {
                    self.held.push(key);
                }
                match key {
                    Key::Space => self.action = true,
                    Key::P | Key::Escape => self.pause = true,
                    Key::Enter | Key::R => self.confirm = true,
                    Key::Q => self.exit = true,
                    _ => {}
                }
            }
            RawEvent::KeyUp(key) => self.held.retain(|k| *k != key),
            RawEvent::PointerMove(p) => self.pointer = Some(p),
            RawEvent::PointerDown(p) => {
                self.pointer = Some(p);
                self.press_side = Some(self.side_of(p));
                self.tap = true;
            }
            RawEvent::PointerUp => self.press_side = None,
            RawEvent::TouchStart(p) => {
                self.pointer = Some(p);
                self.touching = true;
                self.touch_origin = Some(p);
                self.press_side = Some(self.side_of(p));
                self.tap = true;
            }
            RawEvent::TouchMove(p) => {
                self.pointer = Some(p);
                if let Some(origin) = self.touch_origin {
                    let dx = p.x - origin.x;
                    if dx.abs() > SWIPE_THRESHOLD {
                        self.press_side = Some(if dx < 0.0 { Side::Left } else { Side::Right });
                    }
                }
            }
            RawEvent::TouchEnd => {
                self.touching = false;
                self.touch_origin = None;
                self.press_side = None;
            }
        }
    }

    /// Drop every held signal (focus loss: key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.press_side = None;
        self.touch_origin = None;
        self.touching = false;
    }
}

impl InputSource for InputState {
    fn sample(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            left: self.is_held(Key::ArrowLeft)
                || self.is_held(Key::A)
                || self.press_side == Some(Side::Left),
            right: self.is_held(Key::ArrowRight)
                || self.is_held(Key::D)
                || self.press_side == Some(Side::Right),
            up: self.is_held(Key::ArrowUp) || self.is_held(Key::W),
            touching: self.touching,
            pointer: self.pointer,
            action: self.action,
            tap: self.tap,
            pause: self.pause,
            confirm: self.confirm,
            exit: self.exit,
        };

        // Clear one-shot inputs after processing
        self.action = false;
        self.tap = false;
        self.pause = false;
        self.confirm = false;
        self.exit = false;

        snapshot
    }
}

/// Pre-recorded input, then a fallback forever (tests, headless demo)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
    fallback: InputSnapshot,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            fallback: InputSnapshot::default(),
        }
    }

    /// Same held signals every tick
    pub fn held(snapshot: InputSnapshot) -> Self {
        Self {
            frames: VecDeque::new(),
            fallback: snapshot,
        }
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputSnapshot {
        self.frames.pop_front().unwrap_or(self.fallback)
    }
}

/// Input computed by a closure each tick (autopilots)
pub struct FnInput<F>(pub F);

impl<F: FnMut() -> InputSnapshot> InputSource for FnInput<F> {
    fn sample(&mut self) -> InputSnapshot {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_devices() {
        let mut input = InputState::new(480.0);
        assert_eq!(input.sample(), InputSnapshot::default());
    }

    #[test]
    fn test_held_keys_persist_one_shots_clear() {
        let mut input = InputState::new(480.0);
        input.handle(RawEvent::KeyDown(Key::ArrowRight));
        input.handle(RawEvent::KeyDown(Key::Space));
        let first = input.sample();
        assert!(first.right && first.action);
        let second = input.sample();
        assert!(second.right);
        assert!(!second.action);
        input.handle(RawEvent::KeyUp(Key::ArrowRight));
        assert!(!input.sample().right);
    }

    #[test]
    fn test_touch_halves_and_swipe() {
        let mut input = InputState::new(480.0);
        input.handle(RawEvent::TouchStart(Vec2::new(100.0, 400.0)));
        let s = input.sample();
        assert!(s.left && !s.right && s.touching && s.tap);

        // Small drift keeps the side
        input.handle(RawEvent::TouchMove(Vec2::new(120.0, 400.0)));
        assert!(input.sample().left);

        // Swipe right past the threshold flips it
        input.handle(RawEvent::TouchMove(Vec2::new(140.0, 400.0)));
        let s = input.sample();
        assert!(s.right && !s.left);

        input.handle(RawEvent::TouchEnd);
        let s = input.sample();
        assert!(!s.left && !s.right && !s.touching);
    }

    #[test]
    fn test_key_mapping_from_dom_codes() {
        assert_eq!(Key::from_code("KeyA"), Key::A);
        assert_eq!(Key::from_code("Escape"), Key::Escape);
        assert_eq!(Key::from_code("KeyQ"), Key::Q);
        assert_eq!(Key::from_code("F13"), Key::Other);
    }

    #[test]
    fn test_release_all_on_blur() {
        let mut input = InputState::new(480.0);
        input.handle(RawEvent::KeyDown(Key::W));
        input.handle(RawEvent::TouchStart(Vec2::new(300.0, 10.0)));
        input.release_all();
        let s = input.sample();
        assert!(!s.up && !s.touching && !s.right);
    }

    #[test]
    fn test_quit_key_latches_exit_once() {
        let mut input = InputState::new(480.0);
        input.handle(RawEvent::KeyDown(Key::Q));
        let s = input.sample();
        assert!(s.exit && !s.pause && !s.confirm);
        assert!(!input.sample().exit);
    }

    #[test]
    fn test_scripted_falls_back() {
        let mut input = ScriptedInput::new([InputSnapshot {
            pause: true,
            ..Default::default()
        }]);
        assert!(input.sample().pause);
        assert!(!input.sample().pause);
    }
}
