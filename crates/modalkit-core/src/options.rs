#![forbid(unsafe_code)]

//! Controller configuration: markup attribute names, CSS class names and
//! transition timing.
//!
//! [`ModalOptions`] is the resolved configuration. Callers never build it
//! field by field; they supply a [`ModalOverrides`] (every field optional)
//! which is merged onto the defaults once, at construction.
//!
//! # Defaults
//!
//! | Option | Default |
//! |--------|---------|
//! | `trigger_attr` | `data-modal` |
//! | `speed_attr` | `data-modal-speed` |
//! | `overlay_attr` | `data-modal-overlay` |
//! | `panel_attr` | `data-modal-target` |
//! | `close_attr` | `data-modal-close` |
//! | `fix_attr` | `data-modal-fix` |
//! | `overlay_visible_class` | `overlay-show` |
//! | `panel_block_class` | `block` |
//! | `panel_shown_class` | `window-show` |
//! | `scroll_lock_class` | `dis-scroll` |
//! | `duration_property` | `--transition-modal-time` |
//! | `default_speed` | 300 ms |
//! | `focus_close_button` | `false` |

use std::time::Duration;

use crate::error::ModalError;

/// Default transition duration.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(300);

/// Resolved controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    /// Attribute on a trigger naming the panel it opens.
    pub trigger_attr: String,
    /// Attribute on a trigger overriding the transition duration (ms).
    pub speed_attr: String,
    /// Attribute marking the shared overlay.
    pub overlay_attr: String,
    /// Attribute identifying a panel; its value is matched against the trigger's.
    pub panel_attr: String,
    /// Attribute marking the close button inside a panel.
    pub close_attr: String,
    /// Attribute marking fixed-position elements that need scrollbar padding.
    pub fix_attr: String,
    /// Class added to the overlay while a panel is visible.
    pub overlay_visible_class: String,
    /// Class present on a panel while it is open or transitioning.
    pub panel_block_class: String,
    /// Class that drives the animated part of the transition.
    pub panel_shown_class: String,
    /// Class added to `<body>` while scrolling is locked.
    pub scroll_lock_class: String,
    /// CSS custom property on the overlay carrying the duration in seconds.
    pub duration_property: String,
    /// Transition duration when a trigger carries no override.
    pub default_speed: Duration,
    /// Focus the close button instead of the first focusable element.
    pub focus_close_button: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            trigger_attr: "data-modal".into(),
            speed_attr: "data-modal-speed".into(),
            overlay_attr: "data-modal-overlay".into(),
            panel_attr: "data-modal-target".into(),
            close_attr: "data-modal-close".into(),
            fix_attr: "data-modal-fix".into(),
            overlay_visible_class: "overlay-show".into(),
            panel_block_class: "block".into(),
            panel_shown_class: "window-show".into(),
            scroll_lock_class: "dis-scroll".into(),
            duration_property: "--transition-modal-time".into(),
            default_speed: DEFAULT_SPEED,
            focus_close_button: false,
        }
    }
}

impl ModalOptions {
    /// Merge caller overrides onto the defaults.
    #[must_use]
    pub fn merged(overrides: ModalOverrides) -> Self {
        Self::default().apply(overrides)
    }

    /// Apply overrides on top of `self`. Unset fields keep their value.
    #[must_use]
    pub fn apply(mut self, overrides: ModalOverrides) -> Self {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut self.trigger_attr, overrides.trigger_attr);
        set(&mut self.speed_attr, overrides.speed_attr);
        set(&mut self.overlay_attr, overrides.overlay_attr);
        set(&mut self.panel_attr, overrides.panel_attr);
        set(&mut self.close_attr, overrides.close_attr);
        set(&mut self.fix_attr, overrides.fix_attr);
        set(&mut self.overlay_visible_class, overrides.overlay_visible_class);
        set(&mut self.panel_block_class, overrides.panel_block_class);
        set(&mut self.panel_shown_class, overrides.panel_shown_class);
        set(&mut self.scroll_lock_class, overrides.scroll_lock_class);
        set(&mut self.duration_property, overrides.duration_property);
        set(
            &mut self.default_speed,
            overrides.default_speed_ms.map(Duration::from_millis),
        );
        set(&mut self.focus_close_button, overrides.focus_close_button);
        self
    }

    /// Selector matching the overlay element.
    #[must_use]
    pub fn overlay_selector(&self) -> String {
        format!("[{}]", self.overlay_attr)
    }

    /// Selector matching the panel named `id`.
    #[must_use]
    pub fn panel_selector(&self, id: &str) -> String {
        format!("[{}=\"{}\"]", self.panel_attr, escape_attr_value(id))
    }

    /// Selector matching a panel's close button.
    #[must_use]
    pub fn close_selector(&self) -> String {
        format!("[{}]", self.close_attr)
    }

    /// Selector matching elements that need scrollbar padding compensation.
    #[must_use]
    pub fn fix_selector(&self) -> String {
        format!("[{}]", self.fix_attr)
    }
}

/// Caller-supplied configuration. Every field left `None` keeps its default.
///
/// With the `serde` feature, fields deserialize from camelCase keys; the
/// older `modal*Name` / `defaultSpeed` / `autoFocusToCloseBtn` keys are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct ModalOverrides {
    pub trigger_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalWindowSpeedName"))]
    pub speed_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalOverlayName"))]
    pub overlay_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalWindowName"))]
    pub panel_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalCloseBtnName"))]
    pub close_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "fixElemName"))]
    pub fix_attr: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalOverlayBlockName"))]
    pub overlay_visible_class: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalWindowBlockName"))]
    pub panel_block_class: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "modalWindowShowName"))]
    pub panel_shown_class: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "disableScrollName"))]
    pub scroll_lock_class: Option<String>,
    pub duration_property: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "defaultSpeed"))]
    pub default_speed_ms: Option<u64>,
    #[cfg_attr(feature = "serde", serde(alias = "autoFocusToCloseBtn"))]
    pub focus_close_button: Option<bool>,
}

impl ModalOverrides {
    /// Create an empty override set (all defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default transition duration.
    #[must_use]
    pub fn default_speed(mut self, speed: Duration) -> Self {
        self.default_speed_ms = Some(u64::try_from(speed.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Focus the close button on open instead of the first focusable element.
    #[must_use]
    pub fn focus_close_button(mut self, enabled: bool) -> Self {
        self.focus_close_button = Some(enabled);
        self
    }

    /// Override the fixed-element attribute.
    #[must_use]
    pub fn fix_attr(mut self, attr: impl Into<String>) -> Self {
        self.fix_attr = Some(attr.into());
        self
    }

    /// Override the body scroll-lock class.
    #[must_use]
    pub fn scroll_lock_class(mut self, class: impl Into<String>) -> Self {
        self.scroll_lock_class = Some(class.into());
        self
    }
}

/// Parse a per-trigger speed override.
///
/// Accepts whole milliseconds, optionally suffixed with `ms`
/// (`"450"`, `" 450ms "`).
pub fn parse_speed(raw: &str) -> Result<Duration, ModalError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim_end();
    digits
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ModalError::InvalidSpeed {
            value: raw.to_owned(),
        })
}

/// Escape a value for use inside a double-quoted attribute selector.
fn escape_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_overrides_yield_defaults() {
        assert_eq!(
            ModalOptions::merged(ModalOverrides::new()),
            ModalOptions::default()
        );
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let opts = ModalOptions::merged(ModalOverrides {
            panel_shown_class: Some("is-visible".into()),
            default_speed_ms: Some(120),
            ..ModalOverrides::default()
        });
        assert_eq!(opts.panel_shown_class, "is-visible");
        assert_eq!(opts.default_speed, Duration::from_millis(120));
        assert_eq!(opts.panel_block_class, "block");
        assert_eq!(opts.overlay_attr, "data-modal-overlay");
    }

    #[test]
    fn builder_helpers() {
        let opts = ModalOptions::merged(
            ModalOverrides::new()
                .default_speed(Duration::from_millis(50))
                .focus_close_button(true)
                .scroll_lock_class("no-scroll"),
        );
        assert_eq!(opts.default_speed, Duration::from_millis(50));
        assert!(opts.focus_close_button);
        assert_eq!(opts.scroll_lock_class, "no-scroll");
    }

    #[test]
    fn selectors() {
        let opts = ModalOptions::default();
        assert_eq!(opts.overlay_selector(), "[data-modal-overlay]");
        assert_eq!(opts.panel_selector("contact"), "[data-modal-target=\"contact\"]");
        assert_eq!(opts.close_selector(), "[data-modal-close]");
        assert_eq!(opts.fix_selector(), "[data-modal-fix]");
    }

    #[test]
    fn panel_selector_escapes_quotes() {
        let opts = ModalOptions::default();
        assert_eq!(
            opts.panel_selector(r#"a"b\c"#),
            r#"[data-modal-target="a\"b\\c"]"#
        );
    }

    #[test]
    fn parse_speed_accepts_plain_and_suffixed() {
        assert_eq!(parse_speed("450"), Ok(Duration::from_millis(450)));
        assert_eq!(parse_speed(" 450ms "), Ok(Duration::from_millis(450)));
        assert_eq!(parse_speed("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn parse_speed_rejects_garbage() {
        assert_eq!(
            parse_speed("fast"),
            Err(ModalError::InvalidSpeed {
                value: "fast".into()
            })
        );
        assert!(parse_speed("-5").is_err());
        assert!(parse_speed("").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn overrides_from_json() {
        let overrides: ModalOverrides = serde_json::from_str(
            r#"{"panelShownClass":"open","defaultSpeedMs":500,"focusCloseButton":true}"#,
        )
        .unwrap();
        let opts = ModalOptions::merged(overrides);
        assert_eq!(opts.panel_shown_class, "open");
        assert_eq!(opts.default_speed, Duration::from_millis(500));
        assert!(opts.focus_close_button);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn overrides_accept_legacy_keys() {
        let overrides: ModalOverrides = serde_json::from_str(
            r#"{"defaultSpeed":250,"autoFocusToCloseBtn":true,"modalWindowShowName":"shown","fixElemName":"data-fixed"}"#,
        )
        .unwrap();
        let opts = ModalOptions::merged(overrides);
        assert_eq!(opts.default_speed, Duration::from_millis(250));
        assert!(opts.focus_close_button);
        assert_eq!(opts.panel_shown_class, "shown");
        assert_eq!(opts.fix_attr, "data-fixed");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn overrides_reject_unknown_fields() {
        let result: Result<ModalOverrides, _> = serde_json::from_str(r#"{"speed":1}"#);
        assert!(result.is_err());
    }
}
