#![forbid(unsafe_code)]

//! Caller options as data.
//!
//! The JS constructor receives a plain options object. Its data fields are
//! serialized with `JSON.stringify` (which drops the hook functions) and
//! parsed here into [`ModalOverrides`]; the hooks are read separately by
//! name.

use modalkit_core::{ModalError, ModalOverrides};

/// Option keys holding the before-open hook, in lookup order.
pub const OPEN_HOOK_KEYS: [&str; 2] = ["onOpen", "isOpen"];

/// Option keys holding the after-close hook, in lookup order.
pub const CLOSE_HOOK_KEYS: [&str; 2] = ["onClose", "isClose"];

/// Parse the JSON form of a JS options object.
///
/// An empty string or `null` yields the defaults.
///
/// # Errors
///
/// [`ModalError::Host`] when the JSON is malformed, has a field of the
/// wrong type, or names an unknown option.
pub fn overrides_from_json(json: &str) -> Result<ModalOverrides, ModalError> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ModalOverrides::default());
    }
    serde_json::from_str(trimmed)
        .map_err(|err| ModalError::Host(format!("invalid modal options: {err}")))
}
