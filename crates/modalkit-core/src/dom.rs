#![forbid(unsafe_code)]

//! The slice of the document API the controller needs.
//!
//! A [`Dom`] hands out opaque [`Dom::Node`] handles and performs every read
//! and write the controller makes against the page. The browser host
//! implements it over `web_sys`; the test harness implements it over an
//! in-memory tree.
//!
//! # Selectors
//!
//! Selectors passed to the query methods are CSS selectors built from the
//! configured attribute names: `[attr]`, `[attr="value"]`, and comma lists
//! of `tag`, `tag[attr]` and `[attr]` (see [`crate::FOCUSABLE_SELECTOR`]),
//! plus whatever the caller uses to select triggers. Implementations backed
//! by a real document accept any valid selector.
//!
//! # Failure Modes
//!
//! Host calls that can fail in a browser (an invalid selector, a detached
//! node) are reported as "nothing found" or silently ignored. The
//! controller's preconditions are checked through the query results, not
//! through host errors.

use std::fmt;

/// Document operations used by the modal controller.
pub trait Dom {
    /// Handle to an element. Equality is element identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// All elements in document order matching `selector`.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// All descendants of `scope` in document order matching `selector`.
    fn query_all_in(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// First element in document order matching `selector`.
    fn query_first(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `scope` matching `selector`.
    fn query_first_in(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node> {
        self.query_all_in(scope, selector).into_iter().next()
    }

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether an attribute is present (with any value).
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Set an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Add a class to the element's class list.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove a class from the element's class list.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Whether the element's class list contains `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Set an inline style property (including `--custom` properties).
    fn set_style_property(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Remove an inline style property.
    fn remove_style_property(&mut self, node: &Self::Node, property: &str);

    /// Read an inline style property.
    fn style_property(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// Move keyboard focus to `node`.
    fn focus(&mut self, node: &Self::Node);

    /// The currently focused element, if any.
    fn active_element(&self) -> Option<Self::Node>;

    /// The `<body>` element.
    fn body(&self) -> Self::Node;

    /// The document root (`<html>`).
    fn root(&self) -> Self::Node;

    /// Vertical scroll offset of the page in CSS pixels.
    fn scroll_y(&self) -> f64;

    /// Scroll the page to vertical offset `y` (horizontal offset 0).
    fn scroll_to(&mut self, y: f64);

    /// Viewport width including the scrollbar (`window.innerWidth`).
    fn viewport_width(&self) -> f64;

    /// Layout width of an element (`offsetWidth`).
    fn offset_width(&self, node: &Self::Node) -> f64;
}
