#![forbid(unsafe_code)]

//! Input events the controller reacts to.

/// Keys the controller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` (or `.key`) string.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// A document-level input event.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent<N> {
    /// A click whose target is `target`.
    Click { target: N },
    /// A key press.
    KeyDown { key: Key, shift: bool },
}

impl<N> ModalEvent<N> {
    /// Click on `target`.
    pub fn click(target: N) -> Self {
        Self::Click { target }
    }

    /// Tab, or Shift+Tab when `shift` is set.
    pub fn tab(shift: bool) -> Self {
        Self::KeyDown {
            key: Key::Tab,
            shift,
        }
    }

    /// Escape.
    pub fn escape() -> Self {
        Self::KeyDown {
            key: Key::Escape,
            shift: false,
        }
    }
}

/// What the host should do with the event after the controller saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Call `preventDefault()` on the native event.
    pub prevent_default: bool,
    /// The controller changed state or touched the page.
    pub handled: bool,
}

impl EventOutcome {
    /// The controller ignored the event.
    pub const IGNORED: Self = Self {
        prevent_default: false,
        handled: false,
    };

    /// The controller acted and the default action must be suppressed.
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        handled: true,
    };

    /// The controller acted but the default action may proceed.
    pub const HANDLED: Self = Self {
        prevent_default: false,
        handled: true,
    };
}
