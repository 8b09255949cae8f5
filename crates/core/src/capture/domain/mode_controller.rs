//! Keyboard-driven switch between passive inference and data capture.
//!
//! `'0'` selects [`Mode::Normal`], `'1'` selects [`Mode::Capture`], and a
//! letter `'a'..='z'` arms a label for the frame it was pressed on only.
//! ESC is left to the session loop.

/// Operating mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Capture,
}

impl Mode {
    pub fn id(self) -> u8 {
        match self {
            Mode::Normal => 0,
            Mode::Capture => 1,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Normal => write!(f, "normal"),
            Mode::Capture => write!(f, "capture"),
        }
    }
}

/// A key polled on one frame. `None` when nothing was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent(pub Option<i32>);

impl KeyEvent {
    pub const NONE: KeyEvent = KeyEvent(None);

    /// Wraps a raw poll result; negative codes mean "no key".
    pub fn from_code(code: i32) -> Self {
        if code < 0 {
            Self::NONE
        } else {
            Self(Some(code))
        }
    }

    pub fn from_char(c: char) -> Self {
        Self(Some(c as i32))
    }

    pub fn code(self) -> Option<i32> {
        self.0
    }
}

impl From<Option<i32>> for KeyEvent {
    fn from(code: Option<i32>) -> Self {
        code.map_or(Self::NONE, Self::from_code)
    }
}

/// Mode plus the label armed on the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeState {
    pub mode: Mode,
    /// `Some(0..=25)` only on the frame a letter key was pressed.
    pub pending_label: Option<u8>,
}

#[derive(Debug, Default)]
pub struct ModeController {
    state: ModeState,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModeState {
        self.state
    }

    /// Applies this frame's key and returns the resulting state.
    ///
    /// The pending label is cleared first, so it never outlives the
    /// frame its key was pressed on.
    pub fn on_frame(&mut self, key: KeyEvent) -> ModeState {
        self.state.pending_label = None;

        match key.code().and_then(|c| u8::try_from(c).ok()) {
            Some(b'0') => self.state.mode = Mode::Normal,
            Some(b'1') => self.state.mode = Mode::Capture,
            Some(c @ b'a'..=b'z') => self.state.pending_label = Some(c - b'a'),
            _ => {}
        }

        if key.code().is_some() {
            log::trace!("key {:?} -> {:?}", key.code(), self.state);
        }
        self.state
    }
}
