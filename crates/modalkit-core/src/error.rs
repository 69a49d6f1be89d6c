#![forbid(unsafe_code)]

//! Errors surfaced by the modal controller.
//!
//! The controller assumes well-formed markup. These errors describe the ways
//! markup can fail that assumption; none of them is recovered from beyond
//! dropping the action that ran into it.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing overlay | No `[data-modal-overlay]` in the document | Constructor fails |
//! | Missing target attribute | Trigger has no `data-modal` | Click dropped, logged |
//! | Missing panel | `data-modal` names no `[data-modal-target]` | Click dropped, logged |
//! | Invalid speed | `data-modal-speed` is not whole milliseconds | Default speed used, logged |
//! | Host failure | The host DOM API threw | Propagated to the host binding |

use std::fmt;

/// Errors from modal controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    /// No element carries the overlay attribute.
    MissingOverlay {
        /// The attribute that was searched for.
        attribute: String,
    },
    /// A trigger element lacks the attribute naming its panel.
    MissingTargetAttribute {
        /// The attribute that was expected on the trigger.
        attribute: String,
    },
    /// A trigger names a panel that does not exist.
    MissingPanel {
        /// The panel identifier read from the trigger.
        id: String,
    },
    /// A per-trigger speed override could not be parsed.
    InvalidSpeed {
        /// The raw attribute value.
        value: String,
    },
    /// The host environment reported a failure.
    Host(String),
}

impl fmt::Display for ModalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOverlay { attribute } => {
                write!(f, "no overlay element with attribute [{attribute}]")
            }
            Self::MissingTargetAttribute { attribute } => {
                write!(f, "trigger has no [{attribute}] attribute")
            }
            Self::MissingPanel { id } => write!(f, "no modal panel named '{id}'"),
            Self::InvalidSpeed { value } => {
                write!(f, "invalid transition speed '{value}' (expected milliseconds)")
            }
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for ModalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_panel() {
        let err = ModalError::MissingPanel {
            id: "contact".into(),
        };
        assert_eq!(err.to_string(), "no modal panel named 'contact'");
    }

    #[test]
    fn display_overlay_attribute() {
        let err = ModalError::MissingOverlay {
            attribute: "data-modal-overlay".into(),
        };
        assert_eq!(
            err.to_string(),
            "no overlay element with attribute [data-modal-overlay]"
        );
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&ModalError::Host("boom".into()));
    }
}
