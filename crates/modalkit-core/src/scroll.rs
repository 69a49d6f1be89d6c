#![forbid(unsafe_code)]

//! Page scroll lock with scrollbar-width compensation.
//!
//! Locking freezes `<body>` at the current scroll offset (lock class plus a
//! negative `top`) and pads the body and every `[data-modal-fix]` element by
//! the width the disappearing scrollbar used to take, so nothing shifts
//! sideways. Releasing undoes each change and scrolls back to the captured
//! offset.
//!
//! # Invariants
//!
//! 1. The offset captured by [`ScrollLock::engage`] is exactly the offset
//!    [`ScrollLock::release`] scrolls back to.
//! 2. Only the inline properties the lock set are touched on release; any
//!    other inline style on the body or fixed elements survives, and the
//!    ones the lock overwrote get their prior values back.
//! 3. The scroll-back on release runs while the root still has
//!    `scroll-behavior: auto`; the page's own value comes back afterwards,
//!    so a stylesheet asking for smooth scrolling cannot animate it.
//!
//! # Markup contract
//!
//! | Target | Change while locked |
//! |--------|---------------------|
//! | `<html>` | `scroll-behavior: auto` |
//! | `<body>` | lock class, `padding-right`, `top: -Ypx`, `data-position="Y"` |
//! | `[data-modal-fix]` | `padding-right` |

use crate::dom::Dom;
use crate::options::ModalOptions;

const PADDING_RIGHT: &str = "padding-right";
const TOP: &str = "top";
const SCROLL_BEHAVIOR: &str = "scroll-behavior";
const POSITION_ATTR: &str = "data-position";

/// An inline style property overwritten by the lock.
#[derive(Debug, Clone, PartialEq)]
struct SavedStyle<N> {
    node: N,
    property: &'static str,
    prior: Option<String>,
}

impl<N: Clone> SavedStyle<N> {
    /// Record the current value of `property` on `node`, then overwrite it.
    fn replace<D: Dom<Node = N>>(
        dom: &mut D,
        node: &N,
        property: &'static str,
        value: &str,
    ) -> Self {
        let prior = dom.style_property(node, property);
        dom.set_style_property(node, property, value);
        Self {
            node: node.clone(),
            property,
            prior,
        }
    }

    fn restore<D: Dom<Node = N>>(&self, dom: &mut D) {
        match &self.prior {
            Some(value) => dom.set_style_property(&self.node, self.property, value),
            None => dom.remove_style_property(&self.node, self.property),
        }
    }
}

/// An engaged scroll lock. Dropping it without [`release`](Self::release)
/// leaves the page locked.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an engaged scroll lock must be released"]
pub struct ScrollLock<N> {
    position: f64,
    padding: f64,
    behavior: SavedStyle<N>,
    saved: Vec<SavedStyle<N>>,
}

impl<N: Clone> ScrollLock<N> {
    /// Lock page scrolling at the current offset.
    pub fn engage<D: Dom<Node = N>>(dom: &mut D, options: &ModalOptions) -> Self {
        let body = dom.body();
        let root = dom.root();
        let fixed = dom.query_all(&options.fix_selector());
        let position = dom.scroll_y();
        let padding = (dom.viewport_width() - dom.offset_width(&body)).max(0.0);
        let padding_value = format!("{padding}px");

        let behavior = SavedStyle::replace(dom, &root, SCROLL_BEHAVIOR, "auto");
        let mut saved = Vec::with_capacity(fixed.len() + 2);
        for el in &fixed {
            saved.push(SavedStyle::replace(dom, el, PADDING_RIGHT, &padding_value));
        }
        saved.push(SavedStyle::replace(dom, &body, PADDING_RIGHT, &padding_value));
        saved.push(SavedStyle::replace(dom, &body, TOP, &format!("-{position}px")));

        dom.add_class(&body, &options.scroll_lock_class);
        dom.set_attribute(&body, POSITION_ATTR, &position.to_string());

        tracing::trace!(position, padding, fixed = fixed.len(), "scroll locked");

        Self {
            position,
            padding,
            behavior,
            saved,
        }
    }

    /// Undo the lock and scroll back to the captured offset.
    pub fn release<D: Dom<Node = N>>(self, dom: &mut D, options: &ModalOptions) {
        let body = dom.body();
        dom.remove_class(&body, &options.scroll_lock_class);
        for entry in self.saved.iter().rev() {
            entry.restore(dom);
        }
        dom.scroll_to(self.position);
        self.behavior.restore(dom);
        dom.remove_attribute(&body, POSITION_ATTR);

        tracing::trace!(position = self.position, "scroll unlocked");
    }

    /// Scroll offset captured when the lock was engaged.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Scrollbar compensation applied, in CSS pixels.
    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }
}
