use bitflags::bitflags;

use crate::{Size, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button or touch.
    Primary,
    Secondary,
    Tertiary,
    Other(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Space,
    /// Function keys, numbered from 1.
    F(u8),
    /// Backend-specific code with no named mapping.
    Other(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Text the key produced, if any.
    pub text: Option<char>,
}

impl KeyEvent {
    pub fn new(key: Key, text: Option<char>) -> Self {
        Self { key, text }
    }

    pub fn char(c: char) -> Self {
        Self {
            key: Key::Character(c),
            text: Some(c),
        }
    }
}

/// One event as yielded by the backend for a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum RawEvent {
    Quit,
    Resize(Size),
    KeyDown(KeyEvent),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    Scroll(ScrollDirection),
}

bitflags! {
    /// Pointer button edges seen during a single frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ButtonEdges: u8 {
        const PRIMARY_DOWN = 1 << 0;
        const PRIMARY_UP = 1 << 1;
        const SECONDARY_DOWN = 1 << 2;
    }
}

/// A frame's raw events boiled down to the handful of facts dispatch needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Vec2,
    pub buttons: ButtonEdges,
    pub scroll: Option<ScrollDirection>,
    pub keystroke: Option<KeyEvent>,
    pub resize: Option<Size>,
    pub quit: bool,
}

impl FrameInput {
    /// Folds `events` in order. Later scroll/key/resize events in the same
    /// frame overwrite earlier ones.
    pub fn aggregate(pointer: Vec2, events: &[RawEvent]) -> Self {
        let mut input = FrameInput {
            pointer,
            ..Default::default()
        };
        for event in events {
            match event {
                RawEvent::Quit => input.quit = true,
                RawEvent::Resize(size) => input.resize = Some(*size),
                RawEvent::KeyDown(key) => input.keystroke = Some(key.clone()),
                RawEvent::MouseDown(MouseButton::Primary) => {
                    input.buttons |= ButtonEdges::PRIMARY_DOWN
                }
                RawEvent::MouseDown(MouseButton::Secondary) => {
                    input.buttons |= ButtonEdges::SECONDARY_DOWN
                }
                RawEvent::MouseDown(_) => {}
                RawEvent::MouseUp(MouseButton::Primary) => input.buttons |= ButtonEdges::PRIMARY_UP,
                RawEvent::MouseUp(_) => {}
                RawEvent::Scroll(dir) => input.scroll = Some(*dir),
            }
        }
        input
    }

    pub fn primary_down(&self) -> bool {
        self.buttons.contains(ButtonEdges::PRIMARY_DOWN)
    }

    pub fn primary_up(&self) -> bool {
        self.buttons.contains(ButtonEdges::PRIMARY_UP)
    }

    pub fn secondary_down(&self) -> bool {
        self.buttons.contains(ButtonEdges::SECONDARY_DOWN)
    }
}
